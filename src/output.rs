use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `KINSHIP_QUIET=1` silences human output; JSON envelopes and errors still print
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("KINSHIP_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Quiet,
}

impl OutputMode {
    /// `--json` wins over the quiet setting
    pub fn select(json: bool, quiet: bool) -> Self {
        match (json, quiet) {
            (true, _) => OutputMode::Json,
            (false, true) => OutputMode::Quiet,
            (false, false) => OutputMode::Human,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }

    pub fn is_json(&self) -> bool {
        matches!(self, OutputMode::Json)
    }
}

/// Print a JSON envelope for a successful command
pub fn emit_success(mode: OutputMode, command: &str, data: impl Serialize) -> anyhow::Result<()> {
    if !mode.is_json() {
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&success_envelope(command, data)?)?);
    Ok(())
}

/// Print a JSON envelope for a failed command
pub fn emit_error(err: &anyhow::Error) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&error_envelope(err))?);
    Ok(())
}

fn success_envelope(command: &str, data: impl Serialize) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::json!({
        "ok": true,
        "command": command,
        "data": serde_json::to_value(data)?,
    }))
}

fn error_envelope(err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "error": format!("{:#}", err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_overrides_quiet() {
        assert_eq!(OutputMode::select(true, true), OutputMode::Json);
        assert_eq!(OutputMode::select(true, false), OutputMode::Json);
        assert_eq!(OutputMode::select(false, true), OutputMode::Quiet);
        assert_eq!(OutputMode::select(false, false), OutputMode::Human);
        assert!(!OutputMode::Quiet.is_human());
        assert!(!OutputMode::Quiet.is_json());
    }

    #[test]
    fn test_envelopes() {
        let ok = success_envelope("stats", serde_json::json!({ "atoms": 2 })).unwrap();
        assert_eq!(ok["ok"], true);
        assert_eq!(ok["command"], "stats");
        assert_eq!(ok["data"]["atoms"], 2);

        let err = error_envelope(&anyhow::anyhow!("no atom with id 7"));
        assert_eq!(err["ok"], false);
        assert_eq!(err["error"], "no atom with id 7");
    }
}
