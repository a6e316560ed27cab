use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so it never interleaves
/// with the chat transcript on stdout.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug, `quiet` errors only.
pub fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(quiet, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Both the binary (`intellicare`) and the library (`intellicare_lib`) targets.
fn default_directives(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "intellicare=debug,intellicare_lib=debug"
    } else {
        "intellicare=info,intellicare_lib=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_library_info_events() {
        assert_eq!(default_directives(false, false), "intellicare=info,intellicare_lib=info");
        assert!(EnvFilter::try_new(default_directives(false, false)).is_ok());
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(default_directives(true, true), "error");
        assert_eq!(
            default_directives(false, true),
            "intellicare=debug,intellicare_lib=debug"
        );
    }
}
