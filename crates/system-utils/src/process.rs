use anyhow::Context;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

pub const FALLBACK_EDITOR: &str = "nvim";

/// Splits an `$EDITOR` value into program and leading arguments, so values
/// like `code -w` work. `None` or a blank value falls back to `nvim`.
pub fn editor_argv(editor: Option<&str>) -> anyhow::Result<Vec<String>> {
    let raw = match editor.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(vec![FALLBACK_EDITOR.to_string()]),
    };
    let argv = shell_words::split(raw).with_context(|| format!("invalid $EDITOR {raw:?}"))?;
    if argv.is_empty() {
        return Ok(vec![FALLBACK_EDITOR.to_string()]);
    }
    Ok(argv)
}

/// Runs `argv` followed by `file`, attached to the current terminal, and
/// fails unless it exits successfully.
pub async fn run_attached(argv: &[String], file: &Path, label: &str) -> anyhow::Result<()> {
    let (program, args) = argv
        .split_first()
        .with_context(|| format!("{label}: empty command"))?;
    let status = Command::new(program)
        .args(args)
        .arg(file)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("{label}: failed to start {program}"))?;
    if !status.success() {
        anyhow::bail!("{label} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_nvim() {
        assert_eq!(editor_argv(None).unwrap(), vec!["nvim".to_string()]);
        assert_eq!(editor_argv(Some("   ")).unwrap(), vec!["nvim".to_string()]);
    }

    #[test]
    fn splits_editor_arguments() {
        assert_eq!(
            editor_argv(Some("code -w")).unwrap(),
            vec!["code".to_string(), "-w".to_string()]
        );
        assert_eq!(
            editor_argv(Some("'/opt/my editor/bin' --wait")).unwrap(),
            vec!["/opt/my editor/bin".to_string(), "--wait".to_string()]
        );
    }

    #[test]
    fn rejects_unbalanced_quotes() {
        assert!(editor_argv(Some("vim 'oops")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn reports_non_zero_exit() {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        let argv = vec!["false".to_string()];
        let result = rt.block_on(run_attached(&argv, Path::new("/dev/null"), "editor"));
        let err = result.expect_err("false must fail").to_string();
        assert!(err.contains("editor exited"));
    }

    #[cfg(unix)]
    #[test]
    fn succeeds_on_zero_exit() {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        let argv = vec!["true".to_string()];
        rt.block_on(run_attached(&argv, Path::new("/dev/null"), "editor"))
            .expect("true must succeed");
    }
}
