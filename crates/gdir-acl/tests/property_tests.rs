use gdir_acl::{AccessState, Command, ListKind, apply};
use proptest::prelude::*;

fn drive_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d][0-9]?", 0..5)
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Confirm),
        drive_ids().prop_map(Command::Append),
        prop::collection::vec(0usize..7, 0..4).prop_map(Command::Remove),
        drive_ids().prop_map(Command::Replace),
        Just(Command::Convert),
        Just(Command::Disable),
        (prop::bool::ANY, drive_ids()).prop_map(|(allow, ids)| {
            let kind = if allow { ListKind::Allow } else { ListKind::Block };
            Command::Promote(kind, ids)
        }),
    ]
}

proptest! {
    #[test]
    fn lists_are_never_both_non_empty(commands in prop::collection::vec(command(), 0..30)) {
        let mut state = AccessState::Unrestricted;
        for command in commands {
            // Rejected commands leave the state as it was
            if let Ok(next) = apply(state.clone(), command) {
                state = next;
            }
            let (allow, block) = state.clone().into_lists();
            prop_assert!(allow.is_empty() || block.is_empty());
            prop_assert!(AccessState::from_lists(allow, block).is_ok());
        }
    }

    #[test]
    fn append_is_idempotent(initial in drive_ids(), extra in drive_ids()) {
        let start = apply(AccessState::Unrestricted, Command::Promote(ListKind::Allow, initial)).unwrap();
        prop_assume!(!start.is_unrestricted());

        let once = apply(start, Command::Append(extra.clone())).unwrap();
        let twice = apply(once.clone(), Command::Append(extra)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn convert_twice_restores_original(initial in drive_ids(), allow in prop::bool::ANY) {
        let kind = if allow { ListKind::Allow } else { ListKind::Block };
        let start = apply(AccessState::Unrestricted, Command::Promote(kind, initial)).unwrap();
        prop_assume!(!start.is_unrestricted());

        let converted = apply(start.clone(), Command::Convert).unwrap();
        prop_assert_eq!(converted.kind(), Some(kind.opposite()));
        prop_assert_eq!(converted.drives(), start.drives());

        let restored = apply(converted, Command::Convert).unwrap();
        prop_assert_eq!(restored, start);
    }
}
