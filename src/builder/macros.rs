//! Macros for ergonomic machine construction.

/// Declare a fieldless enum usable as a state id.
///
/// The enum derives everything an id needs (`Clone`, `Copy`, `Ord`, `Hash`,
/// `Debug`, serde) and displays as its variant name.
///
/// # Example
///
/// ```
/// use fsmkit::state_ids;
///
/// state_ids! {
///     pub enum Guard {
///         Patrol,
///         Chase,
///         Flee,
///     }
/// }
///
/// assert_eq!(Guard::Chase.to_string(), "Chase");
/// assert!(Guard::Patrol < Guard::Flee);
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => stringify!($variant)),*
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Fsm, State};

    state_ids! {
        enum Mode {
            Idle,
            Walk,
            Run,
        }
    }

    struct Noop;

    impl State for Noop {
        type Data = ();

        fn update(&mut self, _: ()) {}
    }

    #[test]
    fn state_ids_macro_generates_display() {
        assert_eq!(Mode::Idle.to_string(), "Idle");
        assert_eq!(Mode::Run.to_string(), "Run");
    }

    #[test]
    fn state_ids_are_ordered_by_declaration() {
        assert!(Mode::Idle < Mode::Walk);
        assert!(Mode::Walk < Mode::Run);
    }

    #[test]
    fn state_ids_support_visibility() {
        state_ids! {
            pub enum PublicMode {
                A,
                B,
            }
        }

        let _id = PublicMode::A;
    }

    #[test]
    fn state_ids_drive_a_machine() {
        let mut fsm = Fsm::new();
        fsm.add_state(Mode::Idle, Noop);
        fsm.add_state(Mode::Walk, Noop);

        assert!(fsm.transition_to(&Mode::Walk));
        assert!(!fsm.transition_to(&Mode::Run));
        assert_eq!(fsm.current_state_id(), Some(&Mode::Walk));
    }

    #[test]
    fn state_ids_serialize_as_names() {
        let json = serde_json::to_string(&Mode::Walk).unwrap();
        assert_eq!(json, "\"Walk\"");
        let restored: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, Mode::Walk);
    }
}
