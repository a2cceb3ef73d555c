use clap::Args;
use serde_json::Value;

use drug_cost_core::presets;

use super::simulate::StackingArg;

/// Arguments for printing the reference regimen
#[derive(Args)]
pub struct PresetArgs {
    /// Stacking policy to embed (also decides program order)
    #[arg(long, value_enum, default_value = "independent")]
    pub stacking: StackingArg,
}

pub fn run_preset(args: PresetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let preset = presets::reference_regimen(args.stacking.into());
    Ok(serde_json::to_value(preset)?)
}
