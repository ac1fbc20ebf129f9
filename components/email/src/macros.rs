macro_rules! decl_scenarios {
    (
        $(
            $(#[$attr:meta])*
            $name:ident use $path:literal {
                $(
                    $(#[$field_attr:meta])*
                    $field:ident: $ty:ty
                ),* $(,)?
            }
        ),* $(,)?
    ) => {
        #[derive(Debug)]
        pub enum Scenario {
            $($name($name)),*
        }

        impl Scenario {
            /// Template sources compiled into the binary, keyed by path
            pub const SOURCES: &'static [(&'static str, &'static str)] = &[
                $(($path, include_str!(concat!("../templates/", $path)))),*
            ];

            /// Returns the path to the template file for the email, relative to `templates/`.
            pub const fn path(&self) -> &'static str {
                match self {
                    $(Self::$name(_) => $path),*
                }
            }

            fn render_with(&self, tpl: &Template<'_>) -> String {
                match self {
                    $(Self::$name(content) => tpl.render(content)),*
                }
            }
        }

        $(
            $(#[$attr])*
            #[derive(Debug, Content)]
            pub struct $name {
                $(
                    $(#[$field_attr])*
                    pub $field: $ty,
                )*
            }

            impl $name {
                #[allow(clippy::new_without_default)]
                pub fn new($($field: impl Into<$ty>),*) -> Self {
                    Self { $($field: $field.into()),* }
                }
            }

            impl From<$name> for Scenario {
                fn from(email: $name) -> Self {
                    Scenario::$name(email)
                }
            }
        )*
    };
}
