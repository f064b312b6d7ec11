//! [`Describe`] implementations for leaf and container types.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use super::{Describe, Shape};

macro_rules! describe_as {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::value($name)
                }
            }
        )+
    };
}

describe_as!("int" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!("float" => f32, f64);
describe_as!("boolean" => bool);
describe_as!("string" => String, &'static str, char, PathBuf);
describe_as!("string" => IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);
describe_as!("duration" => Duration);

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        let element = match T::shape() {
            Shape::Value(name) => plural(&name),
            Shape::Block(block) => format!("{} blocks", block.short_name()),
        };
        Shape::Value(Cow::Owned(format!("list of {element}")))
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        map_shape(&K::shape(), &V::shape())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        map_shape(&K::shape(), &V::shape())
    }
}

fn map_shape(key: &Shape, value: &Shape) -> Shape {
    Shape::Value(Cow::Owned(format!(
        "map of {} to {}",
        key.type_name(),
        value.type_name()
    )))
}

fn plural(name: &str) -> String {
    if name.ends_with('s') {
        name.to_owned()
    } else {
        format!("{name}s")
    }
}
