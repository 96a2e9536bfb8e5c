//! Option encoders
//!
//! The daemon's tunable settings are toggled by sending `+name` or `-name`
//! fragments as command arguments. Each option family is a closed enum
//! with a canonical lowercase name; out-of-range values are unrepresentable.

use std::fmt;
use std::str::FromStr;

/// An option that can be toggled on the daemon via `+name` / `-name`
pub trait Toggle {
    /// The canonical lowercase name
    fn as_str(&self) -> &'static str;

    /// Request fragment enabling the option
    fn enable(&self) -> String {
        format!("+{}", self.as_str())
    }

    /// Request fragment disabling the option
    fn disable(&self) -> String {
        format!("-{}", self.as_str())
    }
}

// =============================================================================
// PACK Options
// =============================================================================

/// Packer/container formats the daemon can unpack during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackOption {
    Mime,
    Zip,
    Arj,
    Rar,
    Cab,
    Tar,
    Gz,
    Bzip2,
    Ace,
    Arc,
    Zoo,
    Lharc,
    Chm,
    Cpio,
    Rpm,
    Szip,
    Iso,
    Tnef,
    Dbx,
    Sys,
    Ole,
    Exec,
    WinExec,
    Install,
    Dmg,
}

impl Toggle for PackOption {
    fn as_str(&self) -> &'static str {
        match self {
            PackOption::Mime => "mime",
            PackOption::Zip => "zip",
            PackOption::Arj => "arj",
            PackOption::Rar => "rar",
            PackOption::Cab => "cab",
            PackOption::Tar => "tar",
            PackOption::Gz => "gz",
            PackOption::Bzip2 => "bzip2",
            PackOption::Ace => "ace",
            PackOption::Arc => "arc",
            PackOption::Zoo => "zoo",
            PackOption::Lharc => "lharc",
            PackOption::Chm => "chm",
            PackOption::Cpio => "cpio",
            PackOption::Rpm => "rpm",
            PackOption::Szip => "7zip",
            PackOption::Iso => "iso",
            PackOption::Tnef => "tnef",
            PackOption::Dbx => "dbx",
            PackOption::Sys => "sys",
            PackOption::Ole => "ole",
            PackOption::Exec => "exec",
            PackOption::WinExec => "winexec",
            PackOption::Install => "install",
            PackOption::Dmg => "dmg",
        }
    }
}

impl fmt::Display for PackOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mime" => Ok(PackOption::Mime),
            "zip" => Ok(PackOption::Zip),
            "arj" => Ok(PackOption::Arj),
            "rar" => Ok(PackOption::Rar),
            "cab" => Ok(PackOption::Cab),
            "tar" => Ok(PackOption::Tar),
            "gz" => Ok(PackOption::Gz),
            "bzip2" => Ok(PackOption::Bzip2),
            "ace" => Ok(PackOption::Ace),
            "arc" => Ok(PackOption::Arc),
            "zoo" => Ok(PackOption::Zoo),
            "lharc" => Ok(PackOption::Lharc),
            "chm" => Ok(PackOption::Chm),
            "cpio" => Ok(PackOption::Cpio),
            "rpm" => Ok(PackOption::Rpm),
            "7zip" => Ok(PackOption::Szip),
            "iso" => Ok(PackOption::Iso),
            "tnef" => Ok(PackOption::Tnef),
            "dbx" => Ok(PackOption::Dbx),
            "sys" => Ok(PackOption::Sys),
            "ole" => Ok(PackOption::Ole),
            "exec" => Ok(PackOption::Exec),
            "winexec" => Ok(PackOption::WinExec),
            "install" => Ok(PackOption::Install),
            "dmg" => Ok(PackOption::Dmg),
            _ => Err(format!("unknown pack option: {}", s)),
        }
    }
}

// =============================================================================
// FLAGS Options
// =============================================================================

/// Scan behavior flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Report all scanned files, not only infected ones
    FullFiles,
    /// Scan all files regardless of extension
    AllFiles,
    /// Scan device nodes
    ScanDevices,
}

impl Toggle for Flag {
    fn as_str(&self) -> &'static str {
        match self {
            Flag::FullFiles => "fullfiles",
            Flag::AllFiles => "allfiles",
            Flag::ScanDevices => "scandevices",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullfiles" => Ok(Flag::FullFiles),
            "allfiles" => Ok(Flag::AllFiles),
            "scandevices" => Ok(Flag::ScanDevices),
            _ => Err(format!("unknown flag: {}", s)),
        }
    }
}

// =============================================================================
// SENSITIVITY Options
// =============================================================================

/// Detection sensitivity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensiOption {
    Worm,
    Trojan,
    Adware,
    Spyware,
    Dropper,
    Kit,
    Joke,
    Dangerous,
    Dialer,
    Rootkit,
    Exploit,
    Pup,
    Suspicious,
    Pube,
}

impl Toggle for SensiOption {
    fn as_str(&self) -> &'static str {
        match self {
            SensiOption::Worm => "worm",
            SensiOption::Trojan => "trojan",
            SensiOption::Adware => "adware",
            SensiOption::Spyware => "spyware",
            SensiOption::Dropper => "dropper",
            SensiOption::Kit => "kit",
            SensiOption::Joke => "joke",
            SensiOption::Dangerous => "dangerous",
            SensiOption::Dialer => "dialer",
            SensiOption::Rootkit => "rootkit",
            SensiOption::Exploit => "exploit",
            SensiOption::Pup => "pup",
            SensiOption::Suspicious => "suspicious",
            SensiOption::Pube => "pube",
        }
    }
}

impl fmt::Display for SensiOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensiOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worm" => Ok(SensiOption::Worm),
            "trojan" => Ok(SensiOption::Trojan),
            "adware" => Ok(SensiOption::Adware),
            "spyware" => Ok(SensiOption::Spyware),
            "dropper" => Ok(SensiOption::Dropper),
            "kit" => Ok(SensiOption::Kit),
            "joke" => Ok(SensiOption::Joke),
            "dangerous" => Ok(SensiOption::Dangerous),
            "dialer" => Ok(SensiOption::Dialer),
            "rootkit" => Ok(SensiOption::Rootkit),
            "exploit" => Ok(SensiOption::Exploit),
            "pup" => Ok(SensiOption::Pup),
            "suspicious" => Ok(SensiOption::Suspicious),
            "pube" => Ok(SensiOption::Pube),
            _ => Err(format!("unknown sensitivity option: {}", s)),
        }
    }
}
