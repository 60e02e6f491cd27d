use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A value that can be bound as a path or query parameter.
///
/// The trait is only implemented for the primitive values Google APIs accept as
/// parameters (strings, integers, booleans, floats) and for the wrappers that
/// give them a shape:
///
/// - `Option<T>`: absent when `None`, nothing is bound
/// - `Vec<T>` and slices: repeated parameter
/// - `&T`, `Box<T>`, `Arc<T>`, `Rc<T>`: delegate to `T`
///
/// Binding a value of any other type is a compile error, so a parameter bag can
/// never silently drop a field.
///
/// # Examples
///
/// ```rust
/// use gapi_core::ParamValue;
///
/// assert_eq!(42_u32.to_values(), vec!["42"]);
/// assert_eq!(Some("abc").to_values(), vec!["abc"]);
/// assert!(None::<i64>.to_values().is_empty());
/// assert_eq!(vec![true, false].to_values(), vec!["true", "false"]);
/// ```
pub trait ParamValue {
    /// Appends the string rendering of this value to `values`.
    ///
    /// An absent value appends nothing.
    fn append_values(&self, values: &mut Vec<String>);

    /// Returns the string rendering of this value, empty when absent.
    fn to_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        self.append_values(&mut values);
        values
    }
}

macro_rules! display_param_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                fn append_values(&self, values: &mut Vec<String>) {
                    values.push(self.to_string());
                }
            }
        )*
    };
}

display_param_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

impl ParamValue for str {
    fn append_values(&self, values: &mut Vec<String>) {
        values.push(self.to_owned());
    }
}

impl ParamValue for Cow<'_, str> {
    fn append_values(&self, values: &mut Vec<String>) {
        values.push(self.to_string());
    }
}

impl<T> ParamValue for Option<T>
where
    T: ParamValue,
{
    fn append_values(&self, values: &mut Vec<String>) {
        if let Some(value) = self {
            value.append_values(values);
        }
    }
}

impl<T> ParamValue for [T]
where
    T: ParamValue,
{
    fn append_values(&self, values: &mut Vec<String>) {
        for value in self {
            value.append_values(values);
        }
    }
}

impl<T> ParamValue for Vec<T>
where
    T: ParamValue,
{
    fn append_values(&self, values: &mut Vec<String>) {
        self.as_slice().append_values(values);
    }
}

impl<T> ParamValue for &T
where
    T: ParamValue + ?Sized,
{
    fn append_values(&self, values: &mut Vec<String>) {
        (**self).append_values(values);
    }
}

impl<T> ParamValue for Box<T>
where
    T: ParamValue + ?Sized,
{
    fn append_values(&self, values: &mut Vec<String>) {
        (**self).append_values(values);
    }
}

impl<T> ParamValue for Arc<T>
where
    T: ParamValue + ?Sized,
{
    fn append_values(&self, values: &mut Vec<String>) {
        (**self).append_values(values);
    }
}

impl<T> ParamValue for Rc<T>
where
    T: ParamValue + ?Sized,
{
    fn append_values(&self, values: &mut Vec<String>) {
        (**self).append_values(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_primitives() {
        assert_eq!("drive".to_values(), vec!["drive"]);
        assert_eq!(String::from("v3").to_values(), vec!["v3"]);
        assert_eq!((-12_i32).to_values(), vec!["-12"]);
        assert_eq!(u64::MAX.to_values(), vec!["18446744073709551615"]);
        assert_eq!(true.to_values(), vec!["true"]);
        assert_eq!(1.5_f64.to_values(), vec!["1.5"]);
    }

    #[test]
    fn should_skip_absent_values() {
        assert!(None::<String>.to_values().is_empty());
        assert!(Some(None::<u32>).to_values().is_empty());
        assert!(Vec::<String>::new().to_values().is_empty());
    }

    #[test]
    fn should_repeat_collections() {
        let ids = vec![Some(1), None, Some(3)];
        assert_eq!(ids.to_values(), vec!["1", "3"]);

        let names: &[&str] = &["a", "b"];
        assert_eq!(names.to_values(), vec!["a", "b"]);
    }

    #[test]
    fn should_delegate_through_pointers() {
        let value = String::from("shared");
        assert_eq!((&value).to_values(), vec!["shared"]);
        assert_eq!(Arc::new(7_u8).to_values(), vec!["7"]);
        assert_eq!(Box::new(Cow::Borrowed("cow")).to_values(), vec!["cow"]);
    }
}
