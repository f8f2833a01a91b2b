use cloudinit_env::{Environment, Metadata, Settings};

// Single test in this binary: it mutates the process environment.
#[test]
fn live_build_reads_coreos_variables_and_survives_missing_route_table() {
    use std::env::{remove_var, set_var};

    let td = tempfile::tempdir().expect("tmpdir");
    set_var("COREOS_PUBLIC_IPV4", "198.51.100.77");
    remove_var("COREOS_PRIVATE_IPV4");
    set_var("CLOUDINIT_ENV_ROUTE_TABLE", td.path().join("missing-route"));
    set_var("CLOUDINIT_ENV_ROOT", td.path());

    let mut settings = Settings::default();
    settings.apply_env_overrides();
    assert_eq!(settings.root, td.path());

    let md = Metadata::default();
    let env = Environment::from_settings(&settings, &md);
    assert_eq!(env.lookup("$public_ipv4").unwrap().value, "198.51.100.77");
    assert_eq!(env.lookup("$private_ipv4").unwrap().value, "");
    assert!(env.lookup("$iface_default_ipv4").is_none());
    assert_eq!(env.workspace(), td.path().join("var/lib/coreos-cloudinit"));

    let legacy = Environment::new("/", "", "var/lib/coreos-cloudinit", "coreos-cloudinit", &md);
    assert_eq!(legacy.apply("ip=$public_ipv4"), "ip=198.51.100.77");

    remove_var("COREOS_PUBLIC_IPV4");
    remove_var("CLOUDINIT_ENV_ROUTE_TABLE");
    remove_var("CLOUDINIT_ENV_ROOT");
}
