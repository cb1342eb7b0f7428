//! Composable numeric unit conversions.
//!
//! Used to map between columns, seconds and scroll offsets. Every
//! converter maps forwards (unit A → unit B) and backwards (B → A).

/// A reversible mapping between two numeric units.
pub trait ValueConverter {
    /// Convert an amount in the source unit to the target unit.
    fn forwards(&self, amount: f64) -> f64;

    /// Convert an amount in the target unit back to the source unit.
    fn backwards(&self, amount: f64) -> f64;

    /// Swap the direction of this converter.
    fn inverted(self) -> Inverted<Self>
    where
        Self: Sized,
    {
        Inverted(self)
    }

    /// Chain `next` after this converter: forwards applies `self` then `next`.
    fn then<C: ValueConverter>(self, next: C) -> Composed<Self, C>
    where
        Self: Sized,
    {
        Composed { first: self, second: next }
    }
}

/// A linear conversion `x * factor + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Linear {
    factor: f64,
    offset: f64,
}

impl Linear {
    /// Forwards computes `x * factor + offset`.
    pub const fn new(factor: f64, offset: f64) -> Self {
        Self { factor, offset }
    }

    /// Forwards computes `(x + offset) * factor`.
    pub fn with_offset_first(factor: f64, offset: f64) -> Self {
        Self {
            factor,
            offset: factor * offset,
        }
    }

    pub const fn factor(&self) -> f64 {
        self.factor
    }
}

impl ValueConverter for Linear {
    fn forwards(&self, amount: f64) -> f64 {
        amount * self.factor + self.offset
    }

    fn backwards(&self, amount: f64) -> f64 {
        (amount - self.offset) / self.factor
    }
}

/// A converter running in the opposite direction of the one it wraps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Inverted<C>(C);

impl<C: ValueConverter> ValueConverter for Inverted<C> {
    fn forwards(&self, amount: f64) -> f64 {
        self.0.backwards(amount)
    }

    fn backwards(&self, amount: f64) -> f64 {
        self.0.forwards(amount)
    }
}

/// Two converters applied in sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composed<A, B> {
    first: A,
    second: B,
}

impl<A: ValueConverter, B: ValueConverter> ValueConverter for Composed<A, B> {
    fn forwards(&self, amount: f64) -> f64 {
        self.second.forwards(self.first.forwards(amount))
    }

    fn backwards(&self, amount: f64) -> f64 {
        self.first.backwards(self.second.backwards(amount))
    }
}
