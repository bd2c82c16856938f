//! Manifest (`Info.plist`, `PkgInfo`) rendering.
//!
//! Manifests are rendered with Handlebars in strict mode from an explicit
//! [`ManifestFields`] record. Every substituted value is escaped for the
//! XML quoting structure of the property list, so a `"` or `&` in a
//! copyright notice cannot corrupt the document.
//!
//! A template that references an unknown field, or that does not parse,
//! yields [`Error::TemplateRender`]. Whether that aborts the run is decided
//! by the caller's [`RenderPolicy`].

mod template;

use super::{
    error::{Error, ErrorExt, Result},
    platform::BundleKind,
    settings::BundleDescriptor,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

pub use template::{IOS_INFO_PLIST, MACOS_APP_INFO_PLIST, MACOS_LIBRARY_INFO_PLIST, PKGINFO};

/// What to do when a manifest cannot be rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RenderPolicy {
    /// Abort the run.
    #[default]
    Strict,

    /// Report the error, write an empty manifest and continue.
    ///
    /// Matches the behavior of the legacy packaging scripts. The resulting
    /// bundle is not loadable.
    Lenient,
}

/// Values substituted into manifest templates.
///
/// Field names are the placeholder names templates may use.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ManifestFields {
    /// `CFBundleExecutable`
    pub executable: String,
    /// `CFBundleName`
    pub name: String,
    /// `CFBundleDisplayName`
    pub display_name: String,
    /// `CFBundleIdentifier`
    pub identifier: String,
    /// `CFBundleIconFile`, empty when the bundle has no icon.
    pub icon: String,
    /// `CFBundleVersion`
    pub version: String,
    /// `CFBundleShortVersionString`
    pub short_version: String,
    /// `CFBundleSignature`
    pub signature: String,
    /// `CFBundleGetInfoString`
    pub info: String,
    /// `NSHumanReadableCopyright`
    pub copyright: String,
    /// `NSMainNibFile`
    pub nib_file: String,
    /// `CFBundlePackageType`
    pub package_type: String,
    /// `LSRequiresIPhoneOS`
    pub requires_iphone_os: bool,
}

impl ManifestFields {
    /// Collects the manifest values of a descriptor.
    pub fn from_descriptor(descriptor: &BundleDescriptor, icon: Option<&str>) -> Self {
        let kind = descriptor.kind();
        Self {
            executable: descriptor.executable_name().to_string(),
            name: descriptor.bundle_name().to_string(),
            display_name: descriptor.bundle_name().to_string(),
            identifier: descriptor.bundle_identifier(),
            icon: icon.unwrap_or_default().to_string(),
            version: descriptor.version().to_string(),
            short_version: descriptor.short_version().to_string(),
            signature: descriptor.signature().to_string(),
            info: descriptor.info().to_string(),
            copyright: descriptor.copyright().to_string(),
            nib_file: descriptor.nib_file().to_string(),
            package_type: kind.package_type().to_string(),
            requires_iphone_os: kind == BundleKind::IosApp,
        }
    }
}

/// Returns the built-in `Info.plist` template of a bundle kind.
pub fn builtin_info_plist(kind: BundleKind) -> &'static str {
    match kind {
        BundleKind::IosApp => IOS_INFO_PLIST,
        BundleKind::MacOsApp => MACOS_APP_INFO_PLIST,
        BundleKind::MacOsLibrary => MACOS_LIBRARY_INFO_PLIST,
    }
}

/// Reads a caller-supplied `Info.plist` template.
pub async fn load_template(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .fs_context("failed to read manifest template", path)
}

/// Escapes a value for use inside a property list `<string>` element.
pub fn escape_plist_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders an `Info.plist` template.
pub fn render_info_plist(template: &str, fields: &ManifestFields) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(escape_plist_value);
    render(&handlebars, "Info.plist", template, fields)
}

/// Renders the `PkgInfo` type-code marker.
pub fn render_pkginfo(fields: &ManifestFields) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);
    render(&handlebars, "PkgInfo", PKGINFO, fields)
}

fn render(
    handlebars: &Handlebars<'_>,
    name: &str,
    template: &str,
    fields: &ManifestFields,
) -> Result<String> {
    handlebars
        .render_template(template, fields)
        .map_err(|e| Error::TemplateRender {
            bundle: fields.name.clone(),
            template: name.to_string(),
            reason: e.to_string(),
        })
}

/// Applies `policy` to a render result.
///
/// Under [`RenderPolicy::Lenient`] a failure is logged and turned into an
/// empty body; the error is handed back alongside so callers can report it.
pub fn apply_policy(
    policy: RenderPolicy,
    rendered: Result<String>,
) -> Result<(String, Option<Error>)> {
    match (rendered, policy) {
        (Ok(body), _) => Ok((body, None)),
        (Err(e), RenderPolicy::Strict) => Err(e),
        (Err(e), RenderPolicy::Lenient) => {
            log::warn!("writing empty manifest: {}", e);
            Ok((String::new(), Some(e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(kind: BundleKind) -> ManifestFields {
        ManifestFields {
            executable: "foo.elf".into(),
            name: "foo".into(),
            display_name: "foo".into(),
            identifier: "com.example.app.foo".into(),
            icon: String::new(),
            version: "1.0".into(),
            short_version: "1.0".into(),
            signature: "????".into(),
            info: String::new(),
            copyright: String::new(),
            nib_file: kind.default_nib_file().into(),
            package_type: kind.package_type().into(),
            requires_iphone_os: kind == BundleKind::IosApp,
        }
    }

    #[test]
    fn test_escape_plist_value() {
        assert_eq!(
            escape_plist_value(r#"Say "hi" & <bye>"#),
            "Say &quot;hi&quot; &amp; &lt;bye&gt;"
        );
        assert_eq!(escape_plist_value("plain"), "plain");
    }

    #[test]
    fn test_macos_app_plist_substitutes_fields() {
        let mut f = fields(BundleKind::MacOsApp);
        f.icon = "foo.icns".into();
        f.copyright = r#"(c) "Acme" & Co"#.into();

        let plist = render_info_plist(MACOS_APP_INFO_PLIST, &f).expect("render");

        assert!(plist.contains("<string>foo.elf</string>"));
        assert!(plist.contains("<string>com.example.app.foo</string>"));
        assert!(plist.contains("<key>CFBundleIconFile</key>"));
        assert!(plist.contains("<string>foo.icns</string>"));
        assert!(plist.contains("<string>(c) &quot;Acme&quot; &amp; Co</string>"));
        assert!(plist.contains("<string>APPL</string>"));
        assert!(!plist.contains("{{"));
    }

    #[test]
    fn test_icon_key_omitted_without_icon() {
        let plist =
            render_info_plist(MACOS_APP_INFO_PLIST, &fields(BundleKind::MacOsApp)).expect("render");
        assert!(!plist.contains("CFBundleIconFile"));
    }

    #[test]
    fn test_ios_plist_requires_iphone_os() {
        let plist =
            render_info_plist(IOS_INFO_PLIST, &fields(BundleKind::IosApp)).expect("render");
        assert!(plist.contains("<key>LSRequiresIPhoneOS</key>"));
        assert!(plist.contains("<true/>"));
        assert!(plist.contains("<string>MainWindow</string>"));
        assert_eq!(plist.matches("<key>CFBundleSignature</key>").count(), 1);
    }

    #[test]
    fn test_pkginfo_is_type_code_plus_signature() {
        let marker = render_pkginfo(&fields(BundleKind::MacOsLibrary)).expect("render");
        assert_eq!(marker, "BNDL????");
    }

    #[test]
    fn test_unknown_placeholder_is_render_error() {
        let err = render_info_plist("<string>{{no_such_field}}</string>", &fields(BundleKind::MacOsApp))
            .unwrap_err();
        match err {
            Error::TemplateRender { bundle, template, .. } => {
                assert_eq!(bundle, "foo");
                assert_eq!(template, "Info.plist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_template_is_render_error() {
        let err = render_info_plist("{{#if icon}}unterminated", &fields(BundleKind::MacOsApp))
            .unwrap_err();
        assert!(err.is_template_error());
    }

    #[test]
    fn test_policy() {
        let failing = || {
            render_info_plist("{{missing}}", &fields(BundleKind::MacOsApp))
        };

        assert!(apply_policy(RenderPolicy::Strict, failing()).is_err());

        let (body, error) = apply_policy(RenderPolicy::Lenient, failing()).expect("lenient");
        assert!(body.is_empty());
        assert!(error.is_some());

        let (body, error) =
            apply_policy(RenderPolicy::Strict, Ok("ok".to_string())).expect("strict ok");
        assert_eq!(body, "ok");
        assert!(error.is_none());
    }
}
