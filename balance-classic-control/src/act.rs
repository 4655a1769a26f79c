use balance_core::Act;

/// Action of cart-pole: 0 pushes the cart to the left, 1 to the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartPoleAct(pub i64);

impl Act for CartPoleAct {}

impl From<i64> for CartPoleAct {
    fn from(a: i64) -> Self {
        Self(a)
    }
}
