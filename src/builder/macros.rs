//! Macros for terse table and callback literals.

/// Build a `Vec<TransitionDef>` from `name: [from, ...] => to` entries.
///
/// # Example
///
/// ```
/// use turnstile::transitions;
///
/// let table = transitions! {
///     "open": ["closed"] => "open",
///     "close": ["open"] => "closed",
///     "reset": ["open", "closed"] => "closed",
/// };
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table[2].from.len(), 2);
/// ```
#[macro_export]
macro_rules! transitions {
    (
        $(
            $name:literal : [$($from:expr),* $(,)?] => $to:expr
        ),* $(,)?
    ) => {
        ::std::vec![
            $(
                $crate::core::TransitionDef::new(
                    $name,
                    {
                        let from: ::std::vec::Vec<::std::string::String> =
                            ::std::vec![$(::std::string::String::from($from)),*];
                        from
                    },
                    $to,
                )
            ),*
        ]
    };
}

/// Build a `Callbacks` map from `name => closure` entries.
///
/// # Example
///
/// ```
/// use turnstile::{callbacks, transitions, Fsm};
///
/// let fsm = Fsm::new(
///     "closed",
///     transitions! { "open": ["closed"] => "open" },
///     callbacks! {
///         "before_open" => |event| event.abort_with("locked"),
///     },
/// );
///
/// assert!(fsm.fire("open").is_err());
/// ```
#[macro_export]
macro_rules! callbacks {
    ($($name:expr => $callback:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut callbacks = $crate::engine::Callbacks::new();
        $(
            callbacks.insert(
                ::std::string::String::from($name),
                $crate::engine::callback($callback),
            );
        )*
        callbacks
    }};
}
