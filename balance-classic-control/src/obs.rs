use balance_core::Obs;

/// Observation of cart-pole: cart position, cart velocity, pole angle and pole angular velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleObs(pub [f32; 4]);

impl Obs for CartPoleObs {
    fn len(&self) -> usize {
        1
    }
}
