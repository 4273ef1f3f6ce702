use cucumber::given;

use crate::cucumber::{exchange_world::ExchangeSystem, ExchangeWorld};

#[given("a freshly seeded exchange")]
async fn fresh_exchange(world: &mut ExchangeWorld) {
    world.system = Some(ExchangeSystem::new(1.0, 1.0).await);
}

#[given(
    expr = "a freshly seeded exchange where the bank approves {int}% of transfers and payouts complete on {int}% of polls"
)]
async fn fresh_exchange_with_odds(world: &mut ExchangeWorld, bank: u32, payout: u32) {
    let system = ExchangeSystem::new(f64::from(bank) / 100.0, f64::from(payout) / 100.0).await;
    world.system = Some(system);
}
