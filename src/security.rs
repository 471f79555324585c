//! Fonctions d'intégrité et de confidentialité simulées
//!
//! L'empreinte SHA-256 sert à la vérification anti-falsification affichée
//! dans la console. L'obfuscation (base64 puis inversion) et le masquage sont
//! purement cosmétiques et n'offrent aucune garantie de sécurité.

use crate::models::NetworkEvent;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Chaîne renvoyée quand un texte obfusqué est corrompu
pub const DECRYPTION_ERROR: &str = "*** DECRYPTION ERROR ***";

/// Suffixe ajouté aux charges masquées
pub const MASK_SUFFIX: &str = " [ENCRYPTED]";

const MASK_WIDTH: usize = 20;
const MASK_CHAR: char = '•';

/// Calcule l'empreinte SHA-256 (hexadécimal minuscule, 64 caractères)
pub fn digest(payload: &str) -> String {
    format!("{:x}", Sha256::digest(payload.as_bytes()))
}

pub fn obfuscate(payload: &str) -> String {
    STANDARD.encode(payload.as_bytes()).chars().rev().collect()
}

/// Inverse de [`obfuscate`]. Ne panique jamais: toute entrée invalide
/// donne [`DECRYPTION_ERROR`].
pub fn deobfuscate(cipher: &str) -> String {
    let reversed: String = cipher.chars().rev().collect();

    STANDARD
        .decode(reversed.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| DECRYPTION_ERROR.to_string())
}

/// Masque une charge pour l'affichage (non réversible)
pub fn mask(payload: &str) -> String {
    let width = payload.chars().count().min(MASK_WIDTH);
    let mut masked: String = std::iter::repeat(MASK_CHAR).take(width).collect();
    masked.push_str(MASK_SUFFIX);
    masked
}

/// Recalcule l'empreinte de la charge et la compare à celle enregistrée
pub fn verify_integrity(event: &NetworkEvent) -> bool {
    digest(&event.payload) == event.integrity_digest
}
