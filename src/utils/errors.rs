//! User-Friendly Error Formatting
//!
//! Turns an error chain into a message with hints for the common failure
//! categories: configuration files, physical parameters, pointer backends.

use std::fmt::Write;

use crate::controller::{BackendError, ControllerError};
use crate::trajectory::TrajectoryError;

/// Broad error category used to pick hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Parameter,
    Backend,
    Config,
    Generic,
}

fn categorize(error: &anyhow::Error) -> Category {
    for cause in error.chain() {
        if cause.downcast_ref::<TrajectoryError>().is_some() {
            return Category::Parameter;
        }
        if cause.downcast_ref::<BackendError>().is_some() {
            return Category::Backend;
        }
        if let Some(controller) = cause.downcast_ref::<ControllerError>() {
            return match controller {
                ControllerError::Backend(_) => Category::Backend,
                _ => Category::Parameter,
            };
        }
    }

    if error.chain().any(|cause| {
        let message = cause.to_string();
        message.contains("config") || message.contains("TOML")
    }) {
        return Category::Config;
    }

    Category::Generic
}

/// Format error for user consumption
///
/// Produces a short headline, troubleshooting hints for the error category
/// and the full technical chain.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(&mut output).ok();
    writeln!(&mut output, "error: {}", error).ok();
    writeln!(&mut output).ok();

    match categorize(error) {
        Category::Parameter => format_parameter_error(&mut output),
        Category::Backend => format_backend_error(&mut output),
        Category::Config => format_config_error(&mut output),
        Category::Generic => {}
    }

    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output, "  {:#}", error).ok();
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "Run with -vv for debug logs, or set RUST_LOG=windmouse=trace."
    )
    .ok();

    output
}

fn format_parameter_error(output: &mut String) {
    writeln!(output, "Invalid motion parameters.").ok();
    writeln!(output).ok();
    writeln!(output, "  - gravity_magnitude, max_step and damped_distance must be > 0").ok();
    writeln!(output, "  - wind_magnitude must be >= 0 (0 gives a straight line)").ok();
    writeln!(output, "  - max_steps, when set, must be at least 1").ok();
    writeln!(output).ok();
}

fn format_backend_error(output: &mut String) {
    writeln!(output, "The pointer backend rejected a request.").ok();
    writeln!(output).ok();
    writeln!(output, "  - Check that the backend is connected and has input permission").ok();
    writeln!(output, "  - A failed traversal can be resumed; the target is kept").ok();
    writeln!(output).ok();
}

fn format_config_error(output: &mut String) {
    writeln!(output, "Configuration problem.").ok();
    writeln!(output).ok();
    writeln!(output, "  - Check the file path passed to --config").ok();
    writeln!(output, "  - Sections are [physics], [motion] and [logging]").ok();
    writeln!(output, "  - Every field is optional; remove a line to use its default").ok();
    writeln!(output).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_parameter_category_through_context() {
        let result: Result<(), TrajectoryError> = Err(TrajectoryError::InvalidParameter {
            name: "max_step",
            value: 0.0,
            reason: "must be greater than zero",
        });
        let error = result.context("Invalid [physics] section").unwrap_err();

        assert_eq!(categorize(&error), Category::Parameter);
        let text = format_user_error(&error);
        assert!(text.contains("Invalid motion parameters"));
        assert!(text.contains("max_step = 0"));
    }

    #[test]
    fn test_backend_category() {
        let error = anyhow::Error::from(ControllerError::from(BackendError::Unavailable(
            "no seat".to_string(),
        )));
        assert_eq!(categorize(&error), Category::Backend);
    }

    #[test]
    fn test_config_category() {
        let error = anyhow::anyhow!("Failed to read config file: /nope.toml");
        assert_eq!(categorize(&error), Category::Config);
    }

    #[test]
    fn test_generic_category() {
        let error = anyhow::anyhow!("something else");
        assert_eq!(categorize(&error), Category::Generic);
        assert!(format_user_error(&error).contains("something else"));
    }
}
