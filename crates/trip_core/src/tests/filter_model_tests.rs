use std::sync::{Arc, Mutex};

use super::*;

#[test]
fn starts_on_everything() {
    assert_eq!(FilterModel::new().filter(), FilterKind::Everything);
}

#[test]
fn set_filter_notifies_even_when_unchanged() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut model = FilterModel::new();
    {
        let seen = Arc::clone(&seen);
        model.subscribe(move |kind, filter| {
            seen.lock().expect("lock").push((kind, filter.copied()));
            Ok(())
        });
    }

    model
        .set_filter(UpdateKind::Major, FilterKind::Past)
        .expect("set past");
    model
        .set_filter(UpdateKind::Major, FilterKind::Past)
        .expect("set past again");

    assert_eq!(model.filter(), FilterKind::Past);
    assert_eq!(
        *seen.lock().expect("lock"),
        vec![
            (UpdateKind::Major, Some(FilterKind::Past)),
            (UpdateKind::Major, Some(FilterKind::Past)),
        ]
    );
}
