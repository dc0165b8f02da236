//! The `prepare-asset` and `cleanup-asset` commands.

use crate::asset::AssetProvisioner;
use crate::config::Settings;
use crate::resources::Resources;
use crate::ui;
use crate::Context;
use anyhow::Result;

fn provisioner(settings: &Settings) -> AssetProvisioner {
    AssetProvisioner::new(
        &settings.endpoint,
        Resources::at(&settings.resource_root),
        settings.staging_root.clone(),
    )
}

/// Build and publish the bootstrap assets, printing the script URL token.
pub fn prepare(ctx: &Context, settings: &Settings) -> Result<()> {
    if !ctx.quiet {
        ui::info(&format!(
            "provisioning bootstrap assets for stack {} ...",
            settings.stack
        ));
    }
    if ctx.verbose > 0 {
        ui::info(&format!("staging under {}", settings.staging_root.display()));
    }

    let token = provisioner(settings).provision(&settings.stack)?;

    println!();
    println!("Outputs:");
    println!("init script file URL (base64): {}", token);
    Ok(())
}

/// Deactivate the device identity and purge all published state.
pub fn cleanup(ctx: &Context, settings: &Settings) -> Result<()> {
    if !ctx.quiet {
        ui::info(&format!(
            "cleaning up bootstrap assets of stack {} ...",
            settings.stack
        ));
    }

    provisioner(settings).deprovision(&settings.stack)?;

    if !ctx.quiet {
        ui::success("demo assets cleaned up");
    }
    Ok(())
}
