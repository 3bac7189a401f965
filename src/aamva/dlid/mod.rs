/// AAMVA DL/ID Card Design Standard.
///
/// See: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
mod macros;
use std::collections::HashMap;

use lazy_static::lazy_static;

pub(crate) use macros::*;

use super::elements::ElementTag;

data_elements_enum! {
    /// Data elements read when building a normalized document.
    ///
    /// Older revisions of the standard use `DAR`, `DAS`, `DAT` and `DAF`
    /// where newer ones use `DCA`, `DCB`, `DCD` and `DCU`; both are listed.
    pub enum DataElement {
        /// Customer ID Number (DAQ).
        CustomerIdNumber: b"DAQ",

        /// Customer Family Name (DCS).
        CustomerFamilyName: b"DCS",

        /// Customer First Name (DAC).
        CustomerFirstName: b"DAC",

        /// Customer Middle Name(s) (DAD).
        CustomerMiddleName: b"DAD",

        /// Name Suffix, pre-2009 layout (DAF).
        LegacyNameSuffix: b"DAF",

        /// Name Suffix (DCU).
        NameSuffix: b"DCU",

        /// Address – Street 1 (DAG).
        AddressStreet1: b"DAG",

        /// Address – Street 2 (DAH).
        AddressStreet2: b"DAH",

        /// Address – City (DAI).
        AddressCity: b"DAI",

        /// Address – Jurisdiction Code (DAJ).
        AddressJurisdictionCode: b"DAJ",

        /// Address – Postal Code (DAK).
        AddressPostalCode: b"DAK",

        /// Date of Birth (DBB).
        DateOfBirth: b"DBB",

        /// Document Issue Date (DBD).
        DocumentIssueDate: b"DBD",

        /// Document Expiration Date (DBA).
        DocumentExpirationDate: b"DBA",

        /// Physical Description – Sex (DBC).
        Sex: b"DBC",

        /// Physical Description – Eye Color (DAY).
        EyeColor: b"DAY",

        /// Physical Description – Height (DAU).
        Height: b"DAU",

        /// Jurisdiction-specific vehicle class (DCA).
        VehicleClass: b"DCA",

        /// Vehicle class, pre-2009 layout (DAR).
        LegacyVehicleClass: b"DAR",

        /// Jurisdiction-specific restriction codes (DCB).
        RestrictionCodes: b"DCB",

        /// Restriction codes, pre-2009 layout (DAS).
        LegacyRestrictionCodes: b"DAS",

        /// Jurisdiction-specific endorsement codes (DCD).
        EndorsementCodes: b"DCD",

        /// Endorsement codes, pre-2009 layout (DAT).
        LegacyEndorsementCodes: b"DAT"
    }
}

impl DataElement {
    pub fn from_tag(tag: &ElementTag) -> Option<Self> {
        ELEMENTS_BY_TAG.get(tag).copied()
    }

    pub fn string_id(&self) -> &'static str {
        // SAFETY: element ids are uppercase ASCII literals.
        unsafe { std::str::from_utf8_unchecked(self.id()) }
    }
}

lazy_static! {
    static ref ELEMENTS_BY_TAG: HashMap<ElementTag, DataElement> = {
        let mut map = HashMap::new();

        for e in DataElement::LIST {
            map.insert(e.tag(), e);
        }

        map
    };
}

#[cfg(test)]
mod tests {
    use super::DataElement;
    use crate::aamva::elements::ElementTag;

    #[test]
    fn tags_round_trip() {
        for e in DataElement::LIST {
            assert_eq!(DataElement::from_tag(&e.tag()), Some(e));
        }
    }

    #[test]
    fn unknown_tag() {
        let tag = ElementTag::new("ZZA").unwrap();
        assert_eq!(DataElement::from_tag(&tag), None)
    }

    #[test]
    fn string_ids() {
        assert_eq!(DataElement::CustomerIdNumber.string_id(), "DAQ");
        assert_eq!(DataElement::LegacyEndorsementCodes.string_id(), "DAT");
        assert_eq!(DataElement::COUNT, 23);
    }
}
