use crate::cmd::{ConfigArgs, Settings};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};

pub fn run(_args: ConfigArgs, settings: &Settings, format: OutputFormat) -> CliResult<i32> {
    print_summary(settings, format);
    Ok(SUCCESS)
}
