//! Browser detection and install guidance.

use std::path::PathBuf;

/// Known Chromium-based browser executable names to search for.
/// All of these support CDP (Chrome DevTools Protocol).
const CHROMIUM_EXECUTABLES: &[&str] = &[
    // Chrome
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    // Chromium
    "chromium",
    "chromium-browser",
    // Microsoft Edge
    "msedge",
    "microsoft-edge",
    "microsoft-edge-stable",
    // Brave
    "brave",
    "brave-browser",
];

/// macOS app bundle paths for Chromium-based browsers.
#[cfg(target_os = "macos")]
const MACOS_APP_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Windows installation paths for Chromium-based browsers.
#[cfg(target_os = "windows")]
const WINDOWS_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Result of browser detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Path to the browser executable (if found).
    pub path: Option<PathBuf>,
    /// Platform-specific install instructions (when not found).
    pub install_hint: String,
}

impl DetectionResult {
    fn found(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            install_hint: String::new(),
        }
    }
}

/// Detect a Chromium-based browser on the system.
///
/// Checks (in order):
/// 1. Custom path from config (if provided)
/// 2. CHROME environment variable
/// 3. Platform-specific installation paths (macOS app bundles, Windows paths)
///    - PATH can contain broken wrapper scripts, so these come first
/// 4. Known executable names in PATH (fallback)
pub fn detect_browser(custom_path: Option<&str>) -> DetectionResult {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return DetectionResult::found(p);
        }
        tracing::warn!(path, "configured browser path does not exist, falling back to detection");
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return DetectionResult::found(p);
        }
    }

    #[cfg(target_os = "macos")]
    for path in MACOS_APP_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return DetectionResult::found(p);
        }
    }

    #[cfg(target_os = "windows")]
    for path in WINDOWS_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return DetectionResult::found(p);
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return DetectionResult::found(path);
        }
    }

    DetectionResult {
        path: None,
        install_hint: install_instructions(),
    }
}

/// Get platform-specific install instructions.
pub fn install_instructions() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome"
    } else if cfg!(target_os = "linux") {
        "  Debian/Ubuntu: sudo apt install chromium-browser\n  \
         Fedora:         sudo dnf install chromium\n  \
         Alpine:         apk add chromium"
    } else if cfg!(target_os = "windows") {
        "  winget install Google.Chrome"
    } else {
        "  Download from https://www.google.com/chrome/"
    };

    format!(
        "No Chromium-based browser found. Install one:\n\n\
         {instructions}\n\n\
         Any Chromium-based browser works (Chrome, Chromium, Edge, Brave).\n\n\
         Or set the path in pagecheck.toml:\n  \
         [browser]\n  \
         chrome_path = \"/path/to/browser\"\n\n\
         Or set the CHROME environment variable."
    )
}
