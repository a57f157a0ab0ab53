use proptest::prelude::*;

use iskra_expr::{Layout, ScalarType};

use crate::object::MappedObject;
use crate::offset::OffsetMorph;
use crate::traverse::Accessors;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Text without tokens or macros passes through processing verbatim,
    /// whatever the object.
    #[test]
    fn token_free_text_is_untouched(text in "[a-zA-Z0-9 ();=+*.-]{0,64}") {
        let object = MappedObject::array(ScalarType::Float, 0, Layout::Strided);
        prop_assert_eq!(object.process(&text).unwrap(), text);
    }

    /// Accessor keys other than the object's own type key always fall
    /// back to the bare name.
    #[test]
    fn evaluate_falls_back_to_name(key in "[a-z_]{1,12}") {
        prop_assume!(key != "scalar");
        let object = MappedObject::scalar(ScalarType::Double, 3);
        let mut accessors = Accessors::new();
        accessors.insert(key, "#name".to_string());
        prop_assert_eq!(object.evaluate(&accessors).unwrap(), "obj3");
    }

    /// A two-index macro with no comma never fails: the whole span counts
    /// as the first index.
    #[test]
    fn offset_missing_comma_never_fails(args in "[a-zA-Z0-9_ +*-]{0,24}") {
        let morph = OffsetMorph::new(Layout::Col, "ld");
        let text = format!("$OFFSET{{{args}}}");
        prop_assert_eq!(morph.expand(&text).unwrap(), args);
    }

    /// Substituting twice is the same as substituting once: replacement
    /// values contain no further tokens of the same object.
    #[test]
    fn substitution_is_idempotent(id in 0u32..512, suffix in "(reg|_k|_acc|)") {
        let object = MappedObject::array(ScalarType::Float, id, Layout::Col);
        let template = format!("#scalartype #name{suffix} = #name[#start1 + $OFFSET{{i,j}} * #stride1];");
        let once = object.process(&template).unwrap();
        let twice = object.process(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
