//! Built-in manifest templates.

/// `Info.plist` for iOS applications (flat bundle).
pub const IOS_INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDevelopmentRegion</key>
	<string>English</string>
	<key>CFBundleExecutable</key>
	<string>{{executable}}</string>
	<key>CFBundleGetInfoString</key>
	<string>{{info}}</string>
{{#if icon}}
	<key>CFBundleIconFile</key>
	<string>{{icon}}</string>
{{/if}}
	<key>CFBundleIdentifier</key>
	<string>{{identifier}}</string>
	<key>CFBundleInfoDictionaryVersion</key>
	<string>6.0</string>
	<key>CFBundleDisplayName</key>
	<string>{{display_name}}</string>
	<key>CFBundleName</key>
	<string>{{name}}</string>
	<key>CFBundlePackageType</key>
	<string>{{package_type}}</string>
	<key>CFBundleShortVersionString</key>
	<string>{{short_version}}</string>
	<key>CFBundleSignature</key>
	<string>{{signature}}</string>
	<key>CFBundleVersion</key>
	<string>{{version}}</string>
	<key>NSMainNibFile</key>
	<string>{{nib_file}}</string>
	<key>LSRequiresIPhoneOS</key>
	{{#if requires_iphone_os}}<true/>{{else}}<false/>{{/if}}
</dict>
</plist>
"#;

/// `Contents/Info.plist` for macOS applications.
pub const MACOS_APP_INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDevelopmentRegion</key>
	<string>English</string>
	<key>CFBundleExecutable</key>
	<string>{{executable}}</string>
	<key>CFBundleGetInfoString</key>
	<string>{{info}}</string>
{{#if icon}}
	<key>CFBundleIconFile</key>
	<string>{{icon}}</string>
{{/if}}
	<key>CFBundleIdentifier</key>
	<string>{{identifier}}</string>
	<key>CFBundleInfoDictionaryVersion</key>
	<string>6.0</string>
	<key>CFBundleName</key>
	<string>{{name}}</string>
	<key>CFBundlePackageType</key>
	<string>{{package_type}}</string>
	<key>CFBundleShortVersionString</key>
	<string>{{short_version}}</string>
	<key>CFBundleSignature</key>
	<string>{{signature}}</string>
	<key>CFBundleVersion</key>
	<string>{{version}}</string>
	<key>NSHumanReadableCopyright</key>
	<string>{{copyright}}</string>
	<key>NSMainNibFile</key>
	<string>{{nib_file}}</string>
	<key>NSPrincipalClass</key>
	<string>NSApplication</string>
</dict>
</plist>
"#;

/// `Contents/Info.plist` for loadable component bundles.
pub const MACOS_LIBRARY_INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDevelopmentRegion</key>
	<string>English</string>
	<key>CFBundleExecutable</key>
	<string>{{executable}}</string>
{{#if icon}}
	<key>CFBundleIconFile</key>
	<string>{{icon}}</string>
{{/if}}
	<key>CFBundleName</key>
	<string>{{name}}</string>
	<key>CFBundleIdentifier</key>
	<string>{{identifier}}</string>
	<key>CFBundleInfoDictionaryVersion</key>
	<string>6.0</string>
	<key>CFBundlePackageType</key>
	<string>{{package_type}}</string>
	<key>CFBundleShortVersionString</key>
	<string>{{short_version}}</string>
	<key>CFBundleSignature</key>
	<string>{{signature}}</string>
	<key>CFBundleVersion</key>
	<string>{{version}}</string>
	<key>CSResourcesFileMapped</key>
	<true/>
</dict>
</plist>
"#;

/// `Contents/PkgInfo`: package type followed by signature, no newline.
pub const PKGINFO: &str = "{{package_type}}{{signature}}";
