use serde::{Deserialize, Serialize};
use std::fmt;

/// Browsers the generated artifacts know how to drive.
///
/// Each variant carries the process/window metadata the script artifact needs
/// to launch the browser and attach to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

impl Browser {
    /// Parse a browser name as given on the CLI or in the config file.
    pub fn from_name(name: &str) -> Option<Browser> {
        match name.trim().to_lowercase().as_str() {
            "chrome" => Some(Browser::Chrome),
            "firefox" => Some(Browser::Firefox),
            "edge" => Some(Browser::Edge),
            _ => None,
        }
    }

    /// Name written into the descriptor's `BrowserName` key.
    pub fn descriptor_name(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
        }
    }

    /// Executable the script artifact launches.
    pub fn executable(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome.exe",
            Browser::Firefox => "firefox.exe",
            Browser::Edge => "msedge.exe",
        }
    }

    /// Window class the script artifact waits on after launch.
    pub fn window_class(&self) -> &'static str {
        match self {
            Browser::Chrome | Browser::Edge => "Chrome_WidgetWin_1",
            Browser::Firefox => "MozillaWindowClass",
        }
    }

    /// Human-readable window title fragment, used in script comments.
    pub fn window_title(&self) -> &'static str {
        match self {
            Browser::Chrome => "Google Chrome",
            Browser::Firefox => "Mozilla Firefox",
            Browser::Edge => "Microsoft Edge",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor_name())
    }
}
