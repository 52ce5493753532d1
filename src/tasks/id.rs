//! # Generador de Identificadores
//! src/tasks/id.rs
//!
//! Un id es el timestamp actual en nanosegundos codificado en base 36,
//! seguido de un sufijo aleatorio de cuatro dígitos (`0000`-`9999`).
//!
//! No guarda estado: es función pura del reloj y del RNG. La unicidad es
//! probabilística y solo dentro del proceso.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rango exclusivo del sufijo aleatorio
const SUFFIX_RANGE: u32 = 10_000;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Genera un nuevo identificador
///
/// # Ejemplo
/// ```
/// use task_server::tasks::id;
///
/// let a = id::generate();
/// let b = id::generate();
/// assert!(!a.is_empty());
/// assert_ne!(a, b);
/// ```
pub fn generate() -> String {
    // Un reloj anterior a 1970 no es un escenario real; cae a 0 sin pánico
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let suffix = rand::thread_rng().gen_range(0..SUFFIX_RANGE);

    format!("{}{:04}", to_base36(nanos), suffix)
}

/// Codifica un entero sin signo en base 36 (minúsculas)
fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    // Solo contiene bytes ASCII de BASE36_DIGITS
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1295), "zz");
    }

    #[test]
    fn test_generate_format() {
        let id = generate();

        // Timestamp actual en base 36 ocupa al menos 12 caracteres
        assert!(id.len() >= 16, "id demasiado corto: {}", id);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));

        let suffix = &id[id.len() - 4..];
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_many_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
