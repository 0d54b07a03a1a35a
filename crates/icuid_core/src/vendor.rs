//! Processor vendor identification.

use icuid_macros::{EnumCount, EnumFromIndex, EnumDisplay, EnumName};

use crate::strings::VendorString;

/// Processor vendor
///
/// The numeric value of a vendor is stable, and is reported as the vendor id.
/// Hypervisor vendors are only recognized for display, they never gate any decoding.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumCount, EnumFromIndex, EnumDisplay, EnumName)]
pub enum Vendor {
    /// Unknown vendor
    Unknown = 0,
    /// Intel: "GenuineIntel"
    Intel = 1,
    /// AMD: "AuthenticAMD"
    #[display("AMD")]
    Amd = 2,
    /// Cyrix: "CyrixInstead"
    Cyrix = 3,
    /// NexGen: "NexGenDriven"
    NexGen = 4,
    /// Transmeta: "GenuineTMx86"
    Transmeta = 5,
    /// UMC: "UMC UMC UMC "
    #[display("UMC")]
    Umc = 6,
    /// IDT/Centaur: "CentaurHauls"
    Centaur = 7,
    /// Rise: "RiseRiseRise"
    Rise = 8,
    /// SiS: "SiS SiS SiS "
    #[display("SiS")]
    Sis = 9,
    /// National Semiconductor: "Geode by NSC"
    #[display("NSC")]
    Nsc = 10,
    /// VIA: "VIA VIA VIA "
    #[display("VIA")]
    Via = 11,
    /// KVM hypervisor: "KVMKVMKVM\0\0\0"
    #[display("KVM")]
    Kvm = 12,
    /// Microsoft Hyper-V: "Microsoft Hv"
    #[display("Hyper-V")]
    HyperV = 13,
    /// VMware: "VMwareVMware"
    #[display("VMware")]
    VMware = 14,
    /// Xen HVM: "XenVMMXenVMM"
    #[display("Xen")]
    Xen = 15,
}

impl Vendor {
    /// Resolve the vendor from the 12-byte vendor string
    pub fn from_vendor_string(vendor: &VendorString) -> Vendor {
        match vendor.as_bytes() {
            b"GenuineIntel" => Vendor::Intel,
            b"AuthenticAMD" => Vendor::Amd,
            b"CyrixInstead" => Vendor::Cyrix,
            b"NexGenDriven" => Vendor::NexGen,
            b"GenuineTMx86" => Vendor::Transmeta,
            b"UMC UMC UMC " => Vendor::Umc,
            b"CentaurHauls" => Vendor::Centaur,
            b"RiseRiseRise" => Vendor::Rise,
            b"SiS SiS SiS " => Vendor::Sis,
            b"Geode by NSC" => Vendor::Nsc,
            b"VIA VIA VIA " => Vendor::Via,
            b"KVMKVMKVM\0\0\0" => Vendor::Kvm,
            b"Microsoft Hv" => Vendor::HyperV,
            b"VMwareVMware" => Vendor::VMware,
            b"XenVMMXenVMM" => Vendor::Xen,
            _ => Vendor::Unknown,
        }
    }

    /// Stable numeric id of the vendor
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Check if the vendor is a hypervisor
    pub const fn is_hypervisor(self) -> bool {
        matches!(self, Vendor::Kvm | Vendor::HyperV | Vendor::VMware | Vendor::Xen)
    }
}

impl Default for Vendor {
    fn default() -> Self {
        Vendor::Unknown
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn known_vendor_strings() {
        assert_eq!(Vendor::from_vendor_string(&VendorString::from_bytes(*b"GenuineIntel")), Vendor::Intel);
        assert_eq!(Vendor::from_vendor_string(&VendorString::from_bytes(*b"AuthenticAMD")), Vendor::Amd);
        assert_eq!(Vendor::from_vendor_string(&VendorString::from_bytes(*b"KVMKVMKVM\0\0\0")), Vendor::Kvm);
        assert_eq!(Vendor::from_vendor_string(&VendorString::from_bytes(*b"HygonGenuine")), Vendor::Unknown);
    }

    #[test]
    pub fn ids_are_stable() {
        assert_eq!(Vendor::Unknown.id(), 0);
        assert_eq!(Vendor::Intel.id(), 1);
        assert_eq!(Vendor::Amd.id(), 2);
        assert_eq!(Vendor::Nsc.id(), 10);
        assert_eq!(Vendor::Via.id(), 11);
        assert_eq!(Vendor::Xen.id(), 15);
        assert!(Vendor::HyperV.is_hypervisor());
        assert!(!Vendor::Intel.is_hypervisor());
    }
}
