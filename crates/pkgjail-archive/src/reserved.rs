use std::ffi::OsStr;
use std::path::Path;

const PKGINFO: &str = ".PKGINFO";
const SIGNATURE_PREFIX: &str = "SIGN.RSA";
const SIGNATURE_SUFFIX: &str = ".rsa.pub";

/// Package metadata that never shows up in trees or listings, however
/// well-formed.
///
/// `name` is the sanitized, archive-relative name without a trailing
/// separator; `archive_name` is the base name of the archive file itself.
pub fn is_reserved(name: &str, archive_name: Option<&OsStr>) -> bool {
    if name == PKGINFO || is_signature(name) {
        return true;
    }
    match (Path::new(name).file_name(), archive_name) {
        (Some(base), Some(archive)) => base == archive,
        _ => false,
    }
}

// apk signatures are named `.SIGN.RSA.<key>.rsa.pub`.
fn is_signature(name: &str) -> bool {
    let name = name.strip_prefix('.').unwrap_or(name);
    name.starts_with(SIGNATURE_PREFIX) && name.ends_with(SIGNATURE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkginfo_is_reserved_only_at_top_level() {
        assert!(is_reserved(".PKGINFO", None));
        assert!(!is_reserved("usr/.PKGINFO", None));
        assert!(!is_reserved(".PKGINFO.bak", None));
    }

    #[test]
    fn signature_files_are_reserved() {
        assert!(is_reserved(".SIGN.RSA.alpine-devel@lists.alpinelinux.org-6165ee59.rsa.pub", None));
        assert!(is_reserved("SIGN.RSA.key.rsa.pub", None));
        assert!(!is_reserved(".SIGN.RSA.key.pem", None));
        assert!(!is_reserved("keys/key.rsa.pub", None));
    }

    #[test]
    fn archive_own_name_is_reserved_at_any_depth() {
        let archive = OsStr::new("eza-0.20.0-r0.apk");
        assert!(is_reserved("eza-0.20.0-r0.apk", Some(archive)));
        assert!(is_reserved("nested/eza-0.20.0-r0.apk", Some(archive)));
        assert!(!is_reserved("usr/bin/eza", Some(archive)));
    }
}
