//! Lamp, switch and solenoid identifiers for the Mata Hari playfield.
//!
//! Each namespace is a closed enum whose discriminants are the numbers the
//! driver board uses on the wire. A duplicated number fails to compile.

use std::fmt;

macro_rules! identifiers {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident = $id:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $( $variant = $id, )+
        }

        impl $name {
            /// Every identifier, in wiring order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            pub fn id(self) -> u32 {
                self as u8 as u32
            }

            pub fn from_id(id: u32) -> Option<Self> {
                match id {
                    $( $id => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Identifier as written in configuration files.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                }
            }

            /// Human readable label, as printed on the playfield card.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}: {}", self.id(), self.label())
            }
        }
    };
}

identifiers! {
    /// Lamps on the playfield and backbox.
    pub enum Lamp {
        Bonus1 = 0 => "BONUS 1",
        Bonus2 = 1 => "BONUS 2",
        Bonus3 = 2 => "BONUS 3",
        Bonus4 = 3 => "BONUS 4",
        Bonus5 = 4 => "BONUS 5",
        Bonus6 = 5 => "BONUS 6",
        Bonus7 = 6 => "BONUS 7",
        Bonus8 = 7 => "BONUS 8",
        Bonus9 = 8 => "BONUS 9",
        Bonus10 = 9 => "BONUS 10",
        Bonus20 = 10 => "BONUS 20",
        LastTargetScoresSpecial = 11 => "LAST TARGET SPECIAL",
        BLane = 14 => "B LANE",
        ALane = 15 => "A LANE",
        AbScores1000 = 20 => "A-B 1000",
        AbScores2000 = 21 => "A-B 2000",
        AbScores3000 = 22 => "A-B 3000",
        AbScores4000 = 23 => "A-B 4000",
        AbScores5000 = 24 => "A-B 5000",
        AbScoresExtraBall = 25 => "A-B EXTRA BALL",
        AbScoresSpecial = 26 => "A-B SPECIAL",
        RightOutlane50 = 30 => "RIGHT OUTLANE 50K",
        LeftOutlane50 = 31 => "LEFT OUTLANE 50K",
        PopBumper2 = 34 => "POP BUMPER 2",
        PopBumper1 = 35 => "POP BUMPER 1",
        Bonus5xPotential = 37 => "5X POTENTIAL",
        Bonus3xPotential = 38 => "3X POTENTIAL",
        Bonus2xPotential = 39 => "2X POTENTIAL",
        SamePlayerShootsAgain = 40 => "SAME PLAYER SHOOTS AGAIN",
        Match = 41 => "MATCH",
        ShootAgain = 42 => "SHOOT AGAIN",
        ApronCredit = 43 => "APRON CREDIT",
        Bonus5x = 45 => "BONUS 5X",
        Bonus3x = 46 => "BONUS 3X",
        Bonus2x = 47 => "BONUS 2X",
        BallInPlay = 48 => "BALL IN PLAY",
        HighScoreToDate = 49 => "HIGH SCORE TO DATE",
        GameOver = 50 => "GAME OVER",
        Tilt = 51 => "TILT",
        Player1 = 52 => "PLAYER 1",
        Player2 = 53 => "PLAYER 2",
        Player3 = 54 => "PLAYER 3",
        Player4 = 55 => "PLAYER 4",
        Player1Up = 56 => "PLAYER 1 UP",
        Player2Up = 57 => "PLAYER 2 UP",
        Player3Up = 58 => "PLAYER 3 UP",
        Player4Up = 59 => "PLAYER 4 UP",
    }
}

identifiers! {
    /// Switches in the playfield and cabinet matrix.
    pub enum Switch {
        CreditReset = 5 => "CREDIT/RESET",
        Tilt = 6 => "TILT",
        Outhole = 7 => "OUTHOLE",
        Coin3 = 8 => "COIN#3",
        Coin2 = 9 => "COIN#2",
        Coin1 = 10 => "COIN#1",
        Slam = 15 => "SLAM TILT",
        RightDropTarget4 = 16 => "RIGHT DROP 4",
        RightDropTarget3 = 17 => "RIGHT DROP 3",
        RightDropTarget2 = 18 => "RIGHT DROP 2",
        RightDropTarget1 = 19 => "RIGHT DROP 1",
        LeftDropTarget4 = 20 => "LEFT DROP 4",
        LeftDropTarget3 = 21 => "LEFT DROP 3",
        LeftDropTarget2 = 22 => "LEFT DROP 2",
        LeftDropTarget1 = 23 => "LEFT DROP 1",
        RightInlane = 24 => "RIGHT INLANE",
        LeftInlane = 25 => "LEFT INLANE",
        TenPoints = 26 => "10 POINTS",
        RightBLane = 27 => "RIGHT B LANE",
        LeftALane = 28 => "LEFT A LANE",
        TopBLane = 29 => "TOP B LANE",
        TopALane = 30 => "TOP A LANE",
        Saucer = 31 => "SAUCER",
        RightOutlane = 32 => "RIGHT OUTLANE",
        LeftOutlane = 33 => "LEFT OUTLANE",
        RightSling = 34 => "RIGHT SLING",
        LeftSling = 35 => "LEFT SLING",
        Bumper4 = 36 => "BUMPER 4",
        Bumper1 = 37 => "BUMPER 1",
        Bumper3 = 38 => "BUMPER 3",
        Bumper2 = 39 => "BUMPER 2",
    }
}

identifiers! {
    /// Coils driven by the solenoid board.
    pub enum Solenoid {
        Saucer = 0 => "SAUCER",
        Chime100 = 1 => "CHIME 100",
        Chime1000 = 2 => "CHIME 1000",
        Chime10000 = 3 => "CHIME 10000",
        Chime10 = 4 => "CHIME 10",
        Knocker = 5 => "KNOCKER",
        Outhole = 6 => "OUTHOLE KICKER",
        Bumper1 = 7 => "BUMPER 1",
        Bumper2 = 8 => "BUMPER 2",
        Bumper3 = 9 => "BUMPER 3",
        Bumper4 = 10 => "BUMPER 4",
        LeftSling = 11 => "LEFT SLING",
        LeftDropTargets = 12 => "LEFT DROP RESET",
        RightSling = 13 => "RIGHT SLING",
        RightDropTargets = 14 => "RIGHT DROP RESET",
    }
}
