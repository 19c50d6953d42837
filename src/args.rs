use argh::FromArgs;

#[derive(Debug, FromArgs)]
/// A soil moisture to MQTT publisher
pub struct PlantProbeArgs {
    /// remove the retained discovery topics and exit
    #[argh(switch)]
    pub clean: bool,

    /// provide the path to the config file
    #[argh(option)]
    pub config: Option<String>,

    /// display the version of the app
    #[argh(switch, short = 'v')]
    pub version: bool,
}

impl PlantProbeArgs {
    pub fn from_env() -> Self {
        argh::from_env()
    }
}
