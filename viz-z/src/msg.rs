use cdr::{CdrLe, Infinite};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

pub trait ZSerializer {
    type Input<'a>
    where
        Self: 'a;
    fn serialize(input: Self::Input<'_>) -> cdr::Result<Vec<u8>>;
}

pub trait ZDeserializer {
    type Input<'a>;
    type Output;
    fn deserialize(input: Self::Input<'_>) -> cdr::Result<Self::Output>;
}

// Core Z-Message trait
pub trait ZMessage: Sized {
    type Serdes: for<'a> ZSerializer<Input<'a> = &'a Self> + ZDeserializer;

    fn serialize(&self) -> cdr::Result<Vec<u8>> {
        Self::Serdes::serialize(self)
    }

    fn deserialize(input: <Self::Serdes as ZDeserializer>::Input<'_>) -> cdr::Result<Self>
    where
        Self::Serdes: ZDeserializer<Output = Self>,
    {
        Self::Serdes::deserialize(input)
    }
}

// Blanket implementation for serde-compatible types using CDR
impl<T> ZMessage for T
where
    T: Serialize + for<'a> Deserialize<'a> + 'static,
{
    type Serdes = CdrSerdes<T>;
}

/// CDR (little endian, with encapsulation header), as spoken by rmw_zenoh.
pub struct CdrSerdes<T>(PhantomData<T>);

impl<T> ZSerializer for CdrSerdes<T>
where
    T: Serialize,
{
    type Input<'a>
        = &'a T
    where
        T: 'a;

    fn serialize(input: &T) -> cdr::Result<Vec<u8>> {
        cdr::serialize::<_, _, CdrLe>(input, Infinite)
    }
}

impl<T> ZDeserializer for CdrSerdes<T>
where
    for<'a> T: Deserialize<'a>,
{
    type Input<'b> = &'b [u8];
    type Output = T;

    fn deserialize(input: Self::Input<'_>) -> cdr::Result<T> {
        cdr::deserialize::<T>(input)
    }
}
