use std::{cell::RefCell, rc::Rc};

use hidden_city::{
    flow::SceneStack,
    scenes::start::{NameInput, letter},
};
use winit::keyboard::KeyCode;

struct TrackedScene {
    name: &'static str,
    dropped: DropLog,
}

impl Drop for TrackedScene {
    fn drop(&mut self) {
        self.dropped.borrow_mut().push(self.name);
    }
}

type DropLog = Rc<RefCell<Vec<&'static str>>>;

fn tracked_scenes(names: &[&'static str]) -> (Vec<Box<TrackedScene>>, DropLog) {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let scenes = names
        .iter()
        .map(|&name| {
            Box::new(TrackedScene {
                name,
                dropped: dropped.clone(),
            })
        })
        .collect();
    (scenes, dropped)
}

#[test]
fn should_play_scenes_in_order() {
    let (scenes, dropped) = tracked_scenes(&["start", "map", "game"]);
    let mut stack = SceneStack::new(scenes);

    assert_eq!(stack.len(), 3);
    assert_eq!(stack.current().map(|s| s.name), Some("start"));
    assert_eq!(stack.advance().map(|s| s.name), Some("map"));
    assert_eq!(*dropped.borrow(), ["start"]);
    assert_eq!(stack.advance().map(|s| s.name), Some("game"));
    assert_eq!(*dropped.borrow(), ["start", "map"]);
}

#[test]
fn should_empty_after_the_last_scene() {
    let (scenes, dropped) = tracked_scenes(&["only"]);
    let mut stack = SceneStack::new(scenes);

    assert!(stack.advance().is_none());
    assert!(stack.is_empty());
    assert!(stack.current().is_none());
    assert_eq!(*dropped.borrow(), ["only"]);
    assert!(stack.advance().is_none());
}

#[test]
fn should_keep_current_until_advanced() {
    let (scenes, dropped) = tracked_scenes(&["start", "map"]);
    let mut stack = SceneStack::new(scenes);
    for _ in 0..3 {
        assert_eq!(stack.current().map(|s| s.name), Some("start"));
    }
    assert!(dropped.borrow().is_empty());
}

#[test]
fn should_type_a_name_behind_the_cursor() {
    let mut input = NameInput::new();
    assert_eq!(input.display(), "_");
    assert_eq!(input.name(), "");

    for key in [KeyCode::KeyB, KeyCode::KeyO, KeyCode::KeyB] {
        assert!(!input.process_key(key));
    }
    assert_eq!(input.display(), "BOB_");
    assert_eq!(input.name(), "BOB");
}

#[test]
fn should_delete_letters_but_keep_the_cursor() {
    let mut input = NameInput::new();
    input.process_key(KeyCode::KeyA);
    input.process_key(KeyCode::Backspace);
    assert_eq!(input.display(), "_");
    input.process_key(KeyCode::Backspace);
    assert_eq!(input.display(), "_");
}

#[test]
fn should_ignore_keys_that_are_not_letters() {
    let mut input = NameInput::new();
    for key in [KeyCode::Digit1, KeyCode::Space, KeyCode::ArrowUp, KeyCode::Escape] {
        assert!(!input.process_key(key));
    }
    assert_eq!(input.display(), "_");
}

#[test]
fn should_commit_on_either_enter_key() {
    let mut input = NameInput::new();
    input.process_key(KeyCode::KeyZ);
    assert!(input.process_key(KeyCode::Enter));
    assert!(input.process_key(KeyCode::NumpadEnter));
    assert_eq!(input.name(), "Z");
}

#[test]
fn should_map_letter_keys_to_upper_case() {
    assert_eq!(letter(KeyCode::KeyA), Some('A'));
    assert_eq!(letter(KeyCode::KeyM), Some('M'));
    assert_eq!(letter(KeyCode::KeyZ), Some('Z'));
    assert_eq!(letter(KeyCode::Digit0), None);
}
