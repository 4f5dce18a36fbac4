use serde::Deserialize;

use crate::error::Result;

/// Runtime settings, layered: defaults, then an optional `backblast.toml` in
/// the working directory, then `BACKBLAST_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// AO used when neither the text nor the input row names one.
    pub default_ao_id: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Rows parsed per parallel batch.
    pub chunk_size: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            ::config::Config::builder()
                .add_source(::config::File::with_name("backblast").required(false))
                .add_source(::config::Environment::with_prefix("BACKBLAST")),
        )
    }

    fn from_builder(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self> {
        let settings = builder
            .set_default("pretty", false)?
            .set_default("chunk_size", 500)?
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
