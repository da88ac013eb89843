//! UI tests for the Record derive using trybuild
//!
//! Valid annotations must compile against the real `fieldcheck` crate.

#[test]
fn ui_pass_tests() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/pass/*.rs");
}
