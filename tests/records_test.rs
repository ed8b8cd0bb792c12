use std::path::Path;

use hidden_city::{
    error::LoadError,
    records::{PlayerData, PlayerTable, RecordStore, format_time},
};

use crate::common::test_utils::{temp_path, write_file};

mod common;

#[test]
fn should_format_time_as_hours_minutes_seconds() {
    assert_eq!(format_time(3661.0), "01:01:01");
    assert_eq!(format_time(59.0), "00:00:59");
    assert_eq!(format_time(3600.0 * 25.0), "25:00:00");
    assert_eq!(format_time(0.0), "00:00:00");
    assert_eq!(format_time(59.9), "00:00:59");
    assert_eq!(format_time(3600.0 * 120.0 + 61.0), "120:01:01");
}

#[test]
fn should_keep_the_best_time_per_player() {
    let mut table = PlayerTable::new();
    assert!(table.insert(PlayerData::new("Alice", 120.0)));
    assert!(!table.insert(PlayerData::new("Alice", 200.0)));
    assert_eq!(table.get("Alice").map(|p| p.game_time), Some(120.0));

    assert!(table.insert(PlayerData::new("Alice", 90.0)));
    assert_eq!(table.get("Alice").map(|p| p.game_time), Some(90.0));
    assert_eq!(table.len(), 1);
}

#[test]
fn should_not_replace_an_equal_time() {
    let mut table = PlayerTable::new();
    table.insert(PlayerData::new("Bob", 60.0));
    assert!(!table.insert(PlayerData::new("Bob", 60.0)));
}

#[test]
fn should_iterate_players_by_name() {
    let mut table = PlayerTable::new();
    table.insert(PlayerData::new("Carol", 10.0));
    table.insert(PlayerData::new("Alice", 30.0));
    table.insert(PlayerData::new("Bob", 20.0));

    let names: Vec<&str> = table.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob", "Carol"]);
}

#[test]
fn should_round_trip_records_through_a_file() {
    let store = RecordStore::new(temp_path("round_trip.toml"));
    let mut table = PlayerTable::new();
    table.insert(PlayerData::new("Alice", 120.5));
    table.insert(PlayerData::new("Bob", 300.0));

    store.save(&table).expect("save failed");
    let loaded = store.load().expect("load failed");

    assert_eq!(loaded.len(), 2);
    for player in table.iter() {
        let reloaded = loaded.get(&player.name).expect("player missing");
        assert!((reloaded.game_time - player.game_time).abs() < 1e-4);
    }
}

#[test]
fn should_round_trip_an_empty_table() {
    let store = RecordStore::new(temp_path("empty.toml"));
    store.save(&PlayerTable::new()).expect("save failed");
    assert!(store.load().expect("load failed").is_empty());
}

#[test]
fn should_start_empty_without_a_records_file() {
    let store = RecordStore::new(temp_path("does_not_exist.toml"));
    let table = store.load().expect("a missing file is not an error");
    assert!(table.is_empty());
}

#[test]
fn should_start_empty_with_a_malformed_records_file() {
    let path = temp_path("malformed.toml");
    write_file(&path, "[[PlayerList.PlayerData]\nPlayerName = ");
    let table = RecordStore::new(&path).load().expect("malformed files are ignored");
    assert!(table.is_empty());
}

#[test]
fn should_reject_records_without_player_list() {
    let path = temp_path("no_root.toml");
    write_file(&path, "[Players]\ncount = 1\n");
    let result = RecordStore::new(&path).load();
    assert!(matches!(result, Err(LoadError::Schema { .. })), "{:?}", result);
}

#[test]
fn should_reject_a_record_without_game_time() {
    let document = r#"
        [[PlayerList.PlayerData]]
        PlayerName = "ALICE"
    "#;
    let result = PlayerTable::from_document(document, Path::new("inline"));
    assert!(matches!(result, Err(LoadError::Schema { .. })), "{:?}", result);
}

#[test]
fn should_merge_duplicate_records_when_reading() {
    let document = r#"
        [[PlayerList.PlayerData]]
        PlayerName = "ALICE"
        GameTime = 95.0

        [[PlayerList.PlayerData]]
        PlayerName = "ALICE"
        GameTime = 80.25

        [[PlayerList.PlayerData]]
        PlayerName = "BOB"
        GameTime = 100.0
    "#;
    let table = PlayerTable::from_document(document, Path::new("inline")).expect("valid document");
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("ALICE").map(|p| p.game_time), Some(80.25));
}

#[test]
fn should_accept_a_player_list_without_records() {
    let table = PlayerTable::from_document("[PlayerList]\n", Path::new("inline"))
        .expect("an empty list is valid");
    assert!(table.is_empty());
}

#[test]
fn should_report_the_path_when_saving_fails() {
    let path = temp_path("no_such_dir").join("records.toml");
    let store = RecordStore::new(&path);

    let error = store.save(&PlayerTable::new()).unwrap_err();
    assert!(
        format!("{:#}", error).contains(&format!("writing {}", path.display())),
        "{:#}",
        error
    );
}

#[test]
fn should_round_trip_names_that_need_quoting() {
    let store = RecordStore::new(temp_path("quoted.toml"));
    let mut table = PlayerTable::new();
    table.insert(PlayerData::new("SAY \"HI\"", 12.0));
    table.insert(PlayerData::new("", 30.0));
    store.save(&table).expect("save failed");

    assert_eq!(store.load().expect("load failed"), table);
}

#[test]
fn should_format_invalid_times_as_zero() {
    assert_eq!(format_time(f32::NAN), "00:00:00");
    assert_eq!(format_time(-5.0), "00:00:00");
}
