//! The `service-endpoint` command.

use crate::asset::AssetProvisioner;
use crate::config::Settings;
use crate::resources::Resources;
use crate::Context;
use anyhow::Result;

/// Print the MQTT data endpoint the demo device connects to.
pub fn endpoint(_ctx: &Context, settings: &Settings) -> Result<()> {
    let provisioner = AssetProvisioner::new(
        &settings.endpoint,
        Resources::at(&settings.resource_root),
        settings.staging_root.clone(),
    );

    let address = provisioner.service_endpoint(&settings.stack)?;

    println!();
    println!("Outputs:");
    println!("MQTT service endpoint:\n\t{}", address);
    Ok(())
}
