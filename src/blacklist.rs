//! Windows system DLLs that are never bundled.

use std::collections::HashSet;

/// DLLs shipped with Windows itself. This list may need extending.
const SYSTEM_DLLS: &[&str] = &[
    "advapi32.dll",
    "kernel32.dll",
    "msvcrt.dll",
    "ole32.dll",
    "user32.dll",
    "ws2_32.dll",
    "comdlg32.dll",
    "gdi32.dll",
    "imm32.dll",
    "oleaut32.dll",
    "shell32.dll",
    "winmm.dll",
    "winspool.drv",
    "wldap32.dll",
    "ntdll.dll",
    "d3d9.dll",
    "mpr.dll",
    "crypt32.dll",
    "dnsapi.dll",
    "shlwapi.dll",
    "version.dll",
    "iphlpapi.dll",
    "msimg32.dll",
    "setupapi.dll",
    "opengl32.dll",
    "dwmapi.dll",
    "uxtheme.dll",
    "secur32.dll",
    "gdiplus.dll",
    "usp10.dll",
    "comctl32.dll",
    "wsock32.dll",
    "netapi32.dll",
    "userenv.dll",
    "avicap32.dll",
    "avrt.dll",
    "psapi.dll",
    "mswsock.dll",
    "glu32.dll",
    "bcrypt.dll",
    "rpcrt4.dll",
    "mfplat.dll",
    "cfgmgr32.dll",
    "ncrypt.dll",
    "d3d11.dll",
    "dxgi.dll",
    "dwrite.dll",
    "api-ms-win-core-path-l1-1-0.dll",
    "libmocr.dll",
    "libmocr++.dll",
];

/// Set of lowercase DLL names assumed present on every target system.
#[derive(Debug, Clone)]
pub struct Blacklist {
    names: HashSet<String>,
}

impl Blacklist {
    /// Build a blacklist from arbitrary names. Names are stored lowercased.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Case-insensitive membership test.
    #[must_use]
    pub fn contains(&self, dll_name: &str) -> bool {
        self.names.contains(&dll_name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::from_names(SYSTEM_DLLS)
    }
}
