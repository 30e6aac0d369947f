/// Implements [`Value`](crate::Value) and [`Reflect`](crate::reflect::Reflect)
/// for a struct whose listed fields are compared member by member.
///
/// Every listed field must itself implement `Value`. Append `+ Equatable` to
/// also advertise the type's `PartialEq` to the equality dispatch.
///
/// ```
/// use likeness_value::impl_composite;
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl_composite!(Point { x, y } + Equatable);
/// ```
#[macro_export]
macro_rules! impl_composite {
    (@impl $ty:ty { $($field:ident),* } |$this:ident| $caps:block) => {
        impl $crate::Value for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn kind(&self) -> $crate::Kind<'_> {
                $crate::Kind::Composite
            }

            fn capabilities(&self) -> $crate::Capabilities<'_> {
                let $this = self;
                $caps
            }

            fn members(&self) -> ::std::option::Option<$crate::reflect::MemberSource> {
                ::std::option::Option::Some($crate::reflect::MemberSource::of::<Self>())
            }
        }

        impl $crate::reflect::Reflect for $ty {
            fn reflect(members: &mut $crate::reflect::MemberDecls<Self>) {
                $(
                    members.field(stringify!($field), |owner| {
                        $crate::Member::borrowed(&owner.$field)
                    });
                )*
            }
        }
    };
    ($ty:ty { $($field:ident),* $(,)? } + Equatable) => {
        $crate::impl_composite!(@impl $ty { $($field),* } |value| {
            $crate::Capabilities::none().with_equatable(value)
        });
    };
    ($ty:ty { $($field:ident),* $(,)? }) => {
        $crate::impl_composite!(@impl $ty { $($field),* } |_value| {
            $crate::Capabilities::none()
        });
    };
}

/// Implements [`Value`](crate::Value) for a fieldless enum, classifying each
/// variant as a [`Scalar::Variant`](crate::Scalar::Variant).
///
/// The enum must be `Copy + PartialEq`.
///
/// ```
/// use likeness_value::impl_scalar_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Suit {
///     Hearts,
///     Spades,
/// }
///
/// impl_scalar_enum!(Suit { Hearts, Spades });
/// ```
#[macro_export]
macro_rules! impl_scalar_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Value for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn kind(&self) -> $crate::Kind<'_> {
                let name = match self {
                    $($ty::$variant => stringify!($variant),)+
                };
                $crate::Kind::Scalar($crate::Scalar::Variant($crate::Variant::new::<Self>(
                    name,
                    *self as i64,
                )))
            }

            fn capabilities(&self) -> $crate::Capabilities<'_> {
                $crate::Capabilities::none().with_equatable(self)
            }
        }
    };
}
