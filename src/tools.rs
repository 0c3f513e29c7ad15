// External tool resolver for the custom-model evaluator
//
// Resolution order:
// 1) Environment variable override (PHOTOCRITIC_PYTHON_PATH, etc.)
// 2) Sidecar next to the executable
// 3) bin/ subdirectory next to the executable
// 4) PATH fallback (dev-only convenience)

use std::env;
use std::path::PathBuf;

use crate::constants::{ENV_EVALUATOR_PATH, ENV_PYTHON_PATH, EVALUATOR_SCRIPT_NAME};

/// Get the directory containing the current executable
fn exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

/// Resolve a sidecar tool or script path.
fn resolve_tool(env_key: &str, default_name: &str) -> PathBuf {
    // 1) Check environment variable override
    if let Ok(v) = env::var(env_key) {
        let p = PathBuf::from(&v);
        if p.exists() {
            return p;
        }
    }

    // Add .exe on Windows for binaries (scripts keep their extension)
    let mut filename = default_name.to_string();
    if cfg!(windows) && !filename.contains('.') {
        filename.push_str(".exe");
    }

    if let Some(dir) = exe_dir() {
        // 2) Sidecar next to executable
        let candidate = dir.join(&filename);
        if candidate.exists() {
            return candidate;
        }

        // 3) bin/ subdirectory (common bundling pattern)
        let bin_candidate = dir.join("bin").join(&filename);
        if bin_candidate.exists() {
            return bin_candidate;
        }
    }

    // 4) Fall back to PATH / working directory
    PathBuf::from(default_name)
}

/// Get path to the Python interpreter that runs the evaluator
pub fn python_path() -> PathBuf {
    let default = if cfg!(windows) { "python" } else { "python3" };
    resolve_tool(ENV_PYTHON_PATH, default)
}

/// Get path to the photography evaluator script
pub fn evaluator_path() -> PathBuf {
    resolve_tool(ENV_EVALUATOR_PATH, EVALUATOR_SCRIPT_NAME)
}

/// Check if a tool is available at the resolved path
pub fn is_tool_available(tool: &str) -> bool {
    let path = match tool {
        "python" => python_path(),
        "evaluator" => return evaluator_path().exists(),
        _ => return false,
    };

    if path.exists() {
        return true;
    }

    // Otherwise try running it (for PATH fallback)
    std::process::Command::new(&path)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
