//! Macros for declaring flow events.

/// Generate a `FlowEvent` implementation for a fieldless enum.
///
/// The enum gets `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug`,
/// `Serialize` and `Deserialize` derived, and `name()` returns the variant
/// identifier. The serde derives go through this crate's re-export, so
/// callers need no serde dependency of their own.
///
/// # Example
///
/// ```
/// use sceneflow::flow_event;
/// use sceneflow::core::FlowEvent;
///
/// flow_event! {
///     pub enum MainMenuEvent {
///         StartGame,
///         ShowCredits,
///         ShowSettings,
///         Back,
///     }
/// }
///
/// assert_eq!(MainMenuEvent::ShowSettings.name(), "ShowSettings");
/// ```
#[macro_export]
macro_rules! flow_event {
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
            Hash,
            Debug,
            $crate::__serde::Serialize,
            $crate::__serde::Deserialize
        )]
        #[serde(crate = "sceneflow::__serde")]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::FlowEvent for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
