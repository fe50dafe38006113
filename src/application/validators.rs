use chrono::{Local, NaiveDate};
use validator::{ValidateEmail, ValidationError};

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

pub fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Brazilian phone number, punctuation ignored.
/// Rules:
/// - 10 digits (landline) or 11 digits (mobile)
/// - Area code cannot start with 0
/// - Mobile numbers carry a leading 9 after the area code
pub fn is_valid_phone(phone: &str) -> bool {
    let d = digits(phone);
    let bytes = d.as_bytes();
    match bytes.len() {
        10 => bytes[0] != b'0',
        11 => bytes[0] != b'0' && bytes[2] == b'9',
        _ => false,
    }
}

/// CPF: 11 digits with two mod-11 check digits. Repeated-digit sequences are rejected.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let d: Vec<u32> = digits(cpf).chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != 11 || d.iter().all(|&x| x == d[0]) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = d[..len]
            .iter()
            .zip((2..=len as u32 + 1).rev())
            .map(|(digit, weight)| digit * weight)
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 { 0 } else { rest }
    };

    check(9) == d[9] && check(10) == d[10]
}

/// CNPJ: 14 digits with two weighted mod-11 check digits.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let d: Vec<u32> = digits(cnpj).chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != 14 || d.iter().all(|&x| x == d[0]) {
        return false;
    }

    let check = |weights: &[u32]| {
        let sum: u32 = d.iter().zip(weights).map(|(digit, w)| digit * w).sum();
        match sum % 11 {
            0 | 1 => 0,
            r => 11 - r,
        }
    };

    check(&FIRST) == d[12] && check(&SECOND) == d[13]
}

/// Either a CPF (individual) or a CNPJ (company), chosen by digit count.
pub fn is_valid_document(document: &str) -> bool {
    match digits(document).len() {
        11 => is_valid_cpf(document),
        14 => is_valid_cnpj(document),
        _ => false,
    }
}

// ============================================================================
// Form field validators
// ============================================================================

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() || is_valid_phone(phone) {
        Ok(())
    } else {
        Err(invalid("phone", "Enter a valid phone number with area code"))
    }
}

pub fn validate_document(document: &str) -> Result<(), ValidationError> {
    if document.trim().is_empty() || is_valid_document(document) {
        Ok(())
    } else {
        Err(invalid("document", "Enter a valid CPF or CNPJ"))
    }
}

pub fn validate_not_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date <= Local::now().date_naive() {
        Ok(())
    } else {
        Err(invalid("not_future", "Date cannot be in the future"))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(invalid("required", "This field is required"))
    } else {
        Ok(())
    }
}
