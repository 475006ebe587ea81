//! Output helpers shared by every command

/// Prints `$output` with `$human` or as pretty JSON, depending on the
/// configured format.
#[macro_export]
macro_rules! print_output {
	($ctx:expr, $output:expr, $human:expr) => {{
		match $ctx.format {
			$crate::context::OutputFormat::Human => $human($output),
			$crate::context::OutputFormat::Json => {
				println!("{}", serde_json::to_string_pretty($output)?)
			}
		}
	}};
}
