use assert_cmd::Command;

fn sorted_names(args: &[&str]) -> Vec<String> {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("forti-sync"))
        .arg("sort-key")
        .args(args)
        .output()
        .expect("run");
    assert!(output.status.success());
    String::from_utf8(output.stdout)
        .expect("utf8")
        .lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::to_string)
        .collect()
}

#[test]
fn natural_mode_orders_numeric_suffixes_by_value() {
    assert_eq!(
        sorted_names(&["rule10", "rule9", "rule1"]),
        vec!["rule1", "rule9", "rule10"]
    );
}

#[test]
fn alphabetical_mode_orders_bytewise() {
    assert_eq!(
        sorted_names(&["rule10", "rule9", "rule1", "--mode", "alphabetical"]),
        vec!["rule1", "rule10", "rule9"]
    );
}

#[test]
fn unknown_mode_keeps_input_order() {
    assert_eq!(
        sorted_names(&["b2", "a1", "--mode", "false"]),
        vec!["b2", "a1"]
    );
}

#[test]
fn keys_are_printed_as_hex() {
    Command::new(assert_cmd::cargo::cargo_bin!("forti-sync"))
        .args(["sort-key", "rule1", "plain"])
        .assert()
        .success()
        .stdout("plain\t706c61696e0000000000000000\nrule1\t72756c650000000000000002\n");
}
