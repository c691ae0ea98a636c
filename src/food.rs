use crate::config::{
    BONUS_1, BONUS_2, BONUS_3, ColorTag, SYMBOL_FOOD_1, SYMBOL_FOOD_2, SYMBOL_FOOD_3,
};

/// The three kinds of food pellets a level can contain.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FoodTier {
    One,
    Two,
    Three,
}

impl FoodTier {
    /// All tiers, cheapest first.
    pub const ALL: [FoodTier; 3] = [FoodTier::One, FoodTier::Two, FoodTier::Three];

    /// Returns the number of segments the worm grows when eating this food.
    #[must_use]
    pub fn bonus(self) -> usize {
        match self {
            Self::One => BONUS_1,
            Self::Two => BONUS_2,
            Self::Three => BONUS_3,
        }
    }

    /// Returns the level file symbol (also used as the on-screen glyph).
    #[must_use]
    pub fn symbol(self) -> u8 {
        match self {
            Self::One => SYMBOL_FOOD_1,
            Self::Two => SYMBOL_FOOD_2,
            Self::Three => SYMBOL_FOOD_3,
        }
    }

    /// Returns the tier encoded by a level file symbol, if any.
    #[must_use]
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.symbol() == symbol)
    }

    #[must_use]
    pub fn color(self) -> ColorTag {
        match self {
            Self::One => ColorTag::Food1,
            Self::Two => ColorTag::Food2,
            Self::Three => ColorTag::Food3,
        }
    }
}
