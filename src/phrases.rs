//! The phrase board
//!
//! Sixteen fixed requests, laid out 4x4 on the left-hand block of the
//! keyboard so the board can be operated with one hand.

/// A labeled trigger bound to the literal phrase it speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phrase {
    /// Short label shown on the board
    pub label: &'static str,
    /// Text handed to the speech engine
    pub text: &'static str,
    /// Board key that triggers it
    pub key: char,
}

const fn phrase(label: &'static str, text: &'static str, key: char) -> Phrase {
    Phrase { label, text, key }
}

/// Number of columns on the board
pub const BOARD_COLUMNS: usize = 4;

/// All phrases in board order (row by row)
pub static PHRASES: [Phrase; 16] = [
    phrase("Yes", "Sí", '1'),
    phrase("No", "No", '2'),
    phrase("Food", "Comida", '3'),
    phrase("Water", "Agua", '4'),
    phrase("Restroom", "Baño", 'q'),
    phrase("Bath", "Quiero bañarme", 'w'),
    phrase("Sleepy", "Tengo sueño", 'e'),
    phrase("TV", "Quiero ver televisión", 'r'),
    phrase("Heat", "Tengo calor", 'a'),
    phrase("Cold", "Tengo frío", 's'),
    phrase("Music", "Quiero música", 'd'),
    phrase("Sad", "Me siento triste", 'f'),
    phrase("Stress", "Me siento estresado", 'z'),
    phrase("Pain", "Siento dolor", 'x'),
    phrase("Assistance", "Necesito algo", 'c'),
    phrase("Help", "Tengo una emergencia", 'v'),
];
