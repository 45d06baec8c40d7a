/// Playable characters and the colours they bring.
/// The roster is fixed at startup and never mutated.

/// 24-bit colour, independent of any terminal library.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const SKY_BLUE: Rgb = Rgb(135, 206, 235);
    pub const GOLD: Rgb = Rgb(255, 215, 0);
    pub const GRAY: Rgb = Rgb(200, 200, 200);
    pub const RED: Rgb = Rgb(255, 50, 50);
    pub const GREEN: Rgb = Rgb(50, 200, 50);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    pub name: &'static str,
    pub accent_color: Rgb,
    /// Logical asset name, resolved by the asset provider.
    pub asset_key: &'static str,
}

pub const ROSTER: [Character; 3] = [
    Character { name: "Cat",   accent_color: Rgb(255, 50, 50), asset_key: "cat" },
    Character { name: "Cute",  accent_color: Rgb(50, 255, 50), asset_key: "cute" },
    Character { name: "Ghost", accent_color: Rgb(50, 50, 255), asset_key: "ghost" },
];

/// The roster as an owned list (what the game loop holds).
pub fn default_roster() -> Vec<Character> {
    ROSTER.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_has_at_least_three_distinct_entries() {
        let roster = default_roster();
        assert!(roster.len() >= 3);
        for (i, a) in roster.iter().enumerate() {
            for b in &roster[i + 1..] {
                assert_ne!(a.asset_key, b.asset_key);
                assert_ne!(a.accent_color, b.accent_color);
            }
        }
    }
}
