//! Manufacturing field catalog
//!
//! Field IDs and sizes mirror the firmware's mfg store value table
//! (`sid_pal_mfg_store_value_t`). The numeric IDs are part of the
//! device protocol: changing one is a breaking change, not a refactor.

macro_rules! mfg_catalog {
    ($( $variant:ident = ($id:expr, $size:expr, $name:expr), )*) => {
        /// Identifier of one value stored in the manufacturing page
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum MfgValueId {
            $(
                #[doc = $name]
                $variant,
            )*
        }

        impl MfgValueId {
            /// All catalog entries, in ascending id order
            pub const ALL: &'static [MfgValueId] = &[ $(MfgValueId::$variant,)* ];

            /// Numeric field id as stored on the wire
            pub const fn id(self) -> u16 {
                match self {
                    $(MfgValueId::$variant => $id,)*
                }
            }

            /// Fixed byte size declared by the catalog
            pub const fn size(self) -> usize {
                match self {
                    $(MfgValueId::$variant => $size,)*
                }
            }

            /// Wire name, used as the key in layout config offset maps
            pub const fn name(self) -> &'static str {
                match self {
                    $(MfgValueId::$variant => $name,)*
                }
            }
        }
    };
}

mfg_catalog! {
    Magic = (0, 4, "SID_PAL_MFG_STORE_MAGIC"),
    DevId = (1, 5, "SID_PAL_MFG_STORE_DEVID"),
    Version = (2, 4, "SID_PAL_MFG_STORE_VERSION"),
    SerialNum = (3, 17, "SID_PAL_MFG_STORE_SERIAL_NUM"),
    Smsn = (4, 32, "SID_PAL_MFG_STORE_SMSN"),
    AppPubEd25519 = (5, 32, "SID_PAL_MFG_STORE_APP_PUB_ED25519"),
    DevicePrivEd25519 = (6, 32, "SID_PAL_MFG_STORE_DEVICE_PRIV_ED25519"),
    DevicePubEd25519 = (7, 32, "SID_PAL_MFG_STORE_DEVICE_PUB_ED25519"),
    DevicePubEd25519Signature = (8, 64, "SID_PAL_MFG_STORE_DEVICE_PUB_ED25519_SIGNATURE"),
    DevicePrivP256r1 = (9, 32, "SID_PAL_MFG_STORE_DEVICE_PRIV_P256R1"),
    DevicePubP256r1 = (10, 64, "SID_PAL_MFG_STORE_DEVICE_PUB_P256R1"),
    DevicePubP256r1Signature = (11, 64, "SID_PAL_MFG_STORE_DEVICE_PUB_P256R1_SIGNATURE"),
    DakPubEd25519 = (12, 32, "SID_PAL_MFG_STORE_DAK_PUB_ED25519"),
    DakPubEd25519Signature = (13, 64, "SID_PAL_MFG_STORE_DAK_PUB_ED25519_SIGNATURE"),
    DakEd25519Serial = (14, 4, "SID_PAL_MFG_STORE_DAK_ED25519_SERIAL"),
    DakPubP256r1 = (15, 64, "SID_PAL_MFG_STORE_DAK_PUB_P256R1"),
    DakPubP256r1Signature = (16, 64, "SID_PAL_MFG_STORE_DAK_PUB_P256R1_SIGNATURE"),
    DakP256r1Serial = (17, 4, "SID_PAL_MFG_STORE_DAK_P256R1_SERIAL"),
    ProductPubEd25519 = (18, 32, "SID_PAL_MFG_STORE_PRODUCT_PUB_ED25519"),
    ProductPubEd25519Signature = (19, 64, "SID_PAL_MFG_STORE_PRODUCT_PUB_ED25519_SIGNATURE"),
    ProductEd25519Serial = (20, 4, "SID_PAL_MFG_STORE_PRODUCT_ED25519_SERIAL"),
    ProductPubP256r1 = (21, 64, "SID_PAL_MFG_STORE_PRODUCT_PUB_P256R1"),
    ProductPubP256r1Signature = (22, 64, "SID_PAL_MFG_STORE_PRODUCT_PUB_P256R1_SIGNATURE"),
    ProductP256r1Serial = (23, 4, "SID_PAL_MFG_STORE_PRODUCT_P256R1_SERIAL"),
    ManPubEd25519 = (24, 32, "SID_PAL_MFG_STORE_MAN_PUB_ED25519"),
    ManPubEd25519Signature = (25, 64, "SID_PAL_MFG_STORE_MAN_PUB_ED25519_SIGNATURE"),
    ManEd25519Serial = (26, 4, "SID_PAL_MFG_STORE_MAN_ED25519_SERIAL"),
    ManPubP256r1 = (27, 64, "SID_PAL_MFG_STORE_MAN_PUB_P256R1"),
    ManPubP256r1Signature = (28, 64, "SID_PAL_MFG_STORE_MAN_PUB_P256R1_SIGNATURE"),
    ManP256r1Serial = (29, 4, "SID_PAL_MFG_STORE_MAN_P256R1_SERIAL"),
    SwPubEd25519 = (30, 32, "SID_PAL_MFG_STORE_SW_PUB_ED25519"),
    SwPubEd25519Signature = (31, 64, "SID_PAL_MFG_STORE_SW_PUB_ED25519_SIGNATURE"),
    SwEd25519Serial = (32, 4, "SID_PAL_MFG_STORE_SW_ED25519_SERIAL"),
    SwPubP256r1 = (33, 64, "SID_PAL_MFG_STORE_SW_PUB_P256R1"),
    SwPubP256r1Signature = (34, 64, "SID_PAL_MFG_STORE_SW_PUB_P256R1_SIGNATURE"),
    SwP256r1Serial = (35, 4, "SID_PAL_MFG_STORE_SW_P256R1_SERIAL"),
    AmznPubEd25519 = (36, 32, "SID_PAL_MFG_STORE_AMZN_PUB_ED25519"),
    AmznPubP256r1 = (37, 64, "SID_PAL_MFG_STORE_AMZN_PUB_P256R1"),
    Apid = (38, 4, "SID_PAL_MFG_STORE_APID"),
}
