//! Guest registration adapter.
//!
//! A booking belongs to exactly one party: a registered user resolved from a
//! verified credential, or a one-off guest profile supplied inline. When no
//! usable credential is present, every required guest field must be given —
//! nothing is silently defaulted.

use crate::error::{BookingError, Result};
use crate::types::{GuestProfile, Party, UserId};
use serde::{Deserialize, Serialize};

/// Raw guest form as submitted, before completeness checking.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestForm {
    /// Guest's full name
    pub name: Option<String>,
    /// Guest's age in years
    pub age: Option<u32>,
    /// Father's name
    pub father_name: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Mobile phone number
    pub mobile: Option<String>,
    /// Nationality
    pub nationality: Option<String>,
    /// Profession
    pub profession: Option<String>,
    /// Passport number or national ID
    pub passport_or_nid: Option<String>,
    /// Guest category
    pub guest_type: Option<String>,
    /// Vehicle registration (optional even on a complete form)
    pub vehicle_number: Option<String>,
}

impl GuestForm {
    const REQUIRED: [&'static str; 9] = [
        "name",
        "age",
        "father_name",
        "address",
        "mobile",
        "nationality",
        "profession",
        "passport_or_nid",
        "guest_type",
    ];

    /// Converts the form into a complete profile.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::IncompleteGuestProfile`] naming every missing
    /// or blank required field.
    pub fn into_profile(self) -> Result<GuestProfile> {
        fn take(field: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
            match field {
                Some(value) if !value.trim().is_empty() => value,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        }

        let mut missing = Vec::new();
        let name = take(self.name, "name", &mut missing);
        let age = match self.age {
            Some(age) => age,
            None => {
                missing.push("age");
                0
            }
        };
        let father_name = take(self.father_name, "father_name", &mut missing);
        let address = take(self.address, "address", &mut missing);
        let mobile = take(self.mobile, "mobile", &mut missing);
        let nationality = take(self.nationality, "nationality", &mut missing);
        let profession = take(self.profession, "profession", &mut missing);
        let passport_or_nid = take(self.passport_or_nid, "passport_or_nid", &mut missing);
        let guest_type = take(self.guest_type, "guest_type", &mut missing);

        if missing.is_empty() {
            Ok(GuestProfile {
                name,
                age,
                father_name,
                address,
                mobile,
                nationality,
                profession,
                passport_or_nid,
                guest_type,
                vehicle_number: self.vehicle_number,
            })
        } else {
            Err(BookingError::IncompleteGuestProfile { missing })
        }
    }
}

/// Resolves the party a booking is attributed to.
///
/// A verified user wins; otherwise the guest form must be complete. With
/// neither, the rejection lists every required guest field.
///
/// # Errors
///
/// Returns [`BookingError::IncompleteGuestProfile`] when no verified user is
/// present and the guest form is missing or incomplete.
pub fn resolve_booking_party(
    verified_user: Option<UserId>,
    guest_form: Option<GuestForm>,
) -> Result<Party> {
    if let Some(user_id) = verified_user {
        return Ok(Party::User(user_id));
    }
    match guest_form {
        Some(form) => form.into_profile().map(Party::Guest),
        None => Err(BookingError::IncompleteGuestProfile {
            missing: GuestForm::REQUIRED.to_vec(),
        }),
    }
}
