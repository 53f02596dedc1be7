//! Macros for ergonomic construction of localized text.

/// Build a [`LocalizedText`](crate::core::LocalizedText) from
/// `language => text` pairs. Later pairs win over earlier ones with the
/// same language.
///
/// # Example
///
/// ```
/// use guidegraph::localized;
///
/// let captions = localized! {
///     "de_DE" => "Ja",
///     "en_US" => "Yes",
/// };
///
/// assert_eq!(captions.len(), 2);
/// assert_eq!(captions.get("en_US").map(String::as_str), Some("Yes"));
/// ```
#[macro_export]
macro_rules! localized {
    () => {
        $crate::core::LocalizedText::new()
    };
    ($($language:expr => $text:expr),+ $(,)?) => {{
        let mut map = $crate::core::LocalizedText::new();
        $(
            map.set($language, ::std::string::String::from($text));
        )+
        map
    }};
}
