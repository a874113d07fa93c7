//! Glyphs used by the sky painter.

/// Star glyphs, smallest to largest.
pub const STAR_CHARS: &[char] = &['·', '+', '✦'];

/// Moon surface: lit, mare, crater, glow.
pub const MOON_CHARS: &[char] = &['█', '▓', '▒', '░'];

/// Sun disc.
pub const SUN_CHAR: char = '●';

/// Ray glyphs for 0°, 45°, 90° and 135°.
pub const RAY_CHARS: &[char] = &['│', '╱', '─', '╲'];

/// Wing glyphs for a raised, level and lowered left wing. The right wing
/// mirrors them.
pub const WING_CHARS: &[(char, char)] = &[('\\', '/'), ('─', '─'), ('/', '\\')];

/// Bird bodies for the primary and seagull flocks.
pub const BIRD_BODY_CHARS: &[char] = &['•', '·'];

/// Distant bird silhouettes, flattest to most stretched.
pub const DISTANT_BIRD_CHARS: &[char] = &['‿', '⌄', 'v'];

/// Cloud body shading, dense to thin.
pub const CLOUD_CHARS: &[char] = &['█', '▓'];
