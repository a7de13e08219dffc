//! The structures for configuration. Must be accessible to main.

/// The overall options.
pub struct AphoristConfig<'a> {
    pub command: AphoristCommand<'a>,
    pub convert_config: Option<ConvertConfig<'a>>,
}

impl AphoristConfig<'_> {
    pub fn new<'a>(
        command: AphoristCommand<'a>,
        convert_config: Option<ConvertConfig<'a>>,
    ) -> AphoristConfig<'a> {
        AphoristConfig {
            command,
            convert_config,
        }
    }
}

/// The types of subcommands.
pub enum AphoristCommand<'a> {
    Main,
    Check(CheckConfig<'a>),
    NewSettingsFile,
}

/// Conversion configuration.
pub struct ConvertConfig<'a> {
    /// A transcription, or a directory of them.
    pub input: &'a str,
    pub output_dir: &'a str,
    pub template: Option<&'a str>,
    pub settings: Option<&'a str>,
}

impl ConvertConfig<'_> {
    pub fn new<'a>(
        input: &'a str,
        output_dir: &'a str,
        template: Option<&'a str>,
        settings: Option<&'a str>,
    ) -> ConvertConfig<'a> {
        ConvertConfig {
            input,
            output_dir,
            template,
            settings,
        }
    }
}

/// Footnote-checking configuration.
pub struct CheckConfig<'a> {
    pub input: &'a str,
    /// Print the classified footnotes as JSON instead of the problems found.
    pub json: bool,
}

impl CheckConfig<'_> {
    pub fn new(input: &str, json: bool) -> CheckConfig<'_> {
        CheckConfig { input, json }
    }
}
