#[test]
fn changelog() {
	version_sync::assert_contains_regex!("CHANGELOG.md", "^## {version}$");
}

#[test]
fn readme_license_badge() {
	version_sync::assert_contains_regex!("README.md", r"^!\[Crates\.io - License\]\(https://img\.shields\.io/crates/l/{name}/{version}\)$");
}
