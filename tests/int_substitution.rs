mod support;

use cloudinit_env::{Environment, Metadata};
use support::FakeNetwork;

fn env_with(public_ipv4: &str) -> Environment {
    let md = Metadata {
        public_ipv4: Some(public_ipv4.parse().unwrap()),
        ..Metadata::default()
    };
    let host = FakeNetwork::new().iface("eth0", &["10.1.0.1/24", "10.1.0.2/24"]);
    Environment::build("/", "", "var/lib/coreos-cloudinit", "coreos-cloudinit", &md, &host, |_| None)
}

#[test]
fn substitutes_bare_token() {
    let env = env_with("10.0.0.5");
    assert_eq!(env.apply("visit $public_ipv4 now"), "visit 10.0.0.5 now");
}

#[test]
fn escaped_token_is_literal() {
    let env = env_with("10.0.0.5");
    assert_eq!(env.apply(r"escaped \$public_ipv4"), "escaped $public_ipv4");
}

#[test]
fn multi_line_unit_file() {
    let env = env_with("203.0.113.9");
    let unit = "[Service]\n\
                Environment=ADDR=$public_ipv4\n\
                ExecStart=/usr/bin/etcd --listen $iface_eth0_ipv4_1:2379 --name \\$private_ipv4\n";
    let want = "[Service]\n\
                Environment=ADDR=203.0.113.9\n\
                ExecStart=/usr/bin/etcd --listen 10.1.0.2:2379 --name $private_ipv4\n";
    assert_eq!(env.apply(unit), want);
}

#[test]
fn empty_well_known_value_substitutes_empty() {
    let env = env_with("10.0.0.5");
    assert_eq!(env.apply("v6=[$public_ipv6]"), "v6=[]");
}

#[test]
fn text_without_tokens_unchanged() {
    let env = env_with("10.0.0.5");
    for text in ["", "plain", "$ dollar", "\\ backslash", "$PUBLIC_IPV4 is case sensitive"] {
        assert_eq!(env.apply(text), text);
    }
}

#[test]
fn reusable_substituter_matches_apply() {
    let env = env_with("10.0.0.5");
    let sub = env.substituter().clone();
    let text = "a $public_ipv4 b \\$iface_eth0_ipv4 c $iface_eth0_ipv4";
    assert_eq!(sub.apply(text), env.apply(text));
    assert_eq!(cloudinit_env::apply(env.substitutions(), text), env.apply(text));
}
