//! The demonstration data set: three users who act as sellers, and a book of fourteen orders across all supported
//! currencies.
use pxg_common::CryptoCurrency::{self, Btc, Eth, Ton, Usdt};

use crate::db_types::{NewOrder, NewUser};

/// The seed users, in insertion order.
pub fn seed_users() -> Vec<NewUser> {
    vec![
        NewUser::new("Иван Иванов")
            .with_card("4276123456789014")
            .with_wallet(Ton, "EQBsjE-XmmkQ3MiJiHa7Kz-glCv_VRNYr3l51wEN7_yPC0ae")
            .with_wallet(Btc, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
            .with_wallet(Eth, "0x742d35Cc6634C0532925a3b844Bc454e4438f44e")
            .with_wallet(Usdt, "TKrw8vMpVLEGGGJG1sywbPGGNCF2afjktL"),
        NewUser::new("Петр Петров")
            .with_card("4276234567890128")
            .with_wallet(Ton, "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N")
            .with_wallet(Btc, "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy")
            .with_wallet(Eth, "0x8Ba1f109551bD432803012645Ac136ddd64DBA72")
            .with_wallet(Usdt, "TUrMmF9Gd4rzrXsQ34ui3Wou94E7HFqbNv"),
        NewUser::new("Анна Сидорова")
            .with_card("4276345678901230")
            .with_wallet(Ton, "EQDd8BgSS9xBRwsUYpU9QeQCBj8zqwJsrPnYEEG66jyLvXQi")
            .with_wallet(Btc, "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq")
            .with_wallet(Eth, "0xBE0eB53F46cd790Cd13851d5EFf43D12404d33E8")
            .with_wallet(Usdt, "TGjYzgCyPNoFjHd73aYmL8XSJy6tky5zJy"),
    ]
}

const SEED_BOOK: [(f64, f64, CryptoCurrency); 14] = [
    (5_000.0, 350.0, Ton),
    (10_000.0, 350.0, Ton),
    (15_000.0, 350.0, Ton),
    (20_000.0, 340.0, Ton),
    (25_000.0, 330.0, Ton),
    (50_000.0, 5_000_000.0, Btc),
    (100_000.0, 5_000_000.0, Btc),
    (150_000.0, 5_000_000.0, Btc),
    (30_000.0, 300_000.0, Eth),
    (60_000.0, 300_000.0, Eth),
    (90_000.0, 300_000.0, Eth),
    (9_000.0, 90.0, Usdt),
    (18_000.0, 90.0, Usdt),
    (27_000.0, 90.0, Usdt),
];

/// The seed orders, each paired with the index (into [`seed_users`]) of its seller. Sellers take turns, so every
/// currency has orders from more than one seller. The `seller_id` of the returned orders is a placeholder.
pub fn seed_orders() -> Vec<(usize, NewOrder)> {
    let n_sellers = seed_users().len();
    SEED_BOOK
        .iter()
        .enumerate()
        .map(|(i, &(amount, rate, currency))| (i % n_sellers, NewOrder::new(amount, rate, currency, 0)))
        .collect()
}
