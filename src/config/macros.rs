/// Define a configuration struct with embedded defaults
///
/// Each field is declared as `name: Type = default`. The macro generates the
/// struct with public fields, a `Default` impl built from the listed values,
/// and serde derives with `#[serde(default)]` so partial TOML files load.
///
/// # Example
/// ```
/// # use skrybot::config_struct;
/// config_struct! {
///     pub struct MoneyConfig {
///         position_size_pct: f64 = 0.10,
///         tax_rate: f64 = 0.20,
///     }
/// }
///
/// let money = MoneyConfig::default();
/// assert_eq!(money.tax_rate, 0.20);
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
