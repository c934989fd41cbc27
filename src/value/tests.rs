//! Unit tests for values.
//!
//! This module contains tests for operator semantics, dictionaries,
//! printing and the members of builtin values.

use pretty_assertions::assert_eq;

use crate::ast::expressions::BinaryOperator;

use super::{
    callable::Native,
    dictionary::Dictionary,
    members::lookup_member,
    operations::OperationError,
    value::{Value, ValueKind},
};

fn int(value: i64) -> Value {
    Value::integer(value)
}

fn string(value: &str) -> Value {
    Value::string(value)
}

fn tag(result: Result<Value, OperationError>) -> String {
    result.unwrap_err().tag
}

/// Calls a member method of a builtin value.
fn call_member(receiver: &Value, name: &str, arguments: &[Value]) -> Result<Value, OperationError> {
    let member = lookup_member(receiver, name).unwrap();
    let ValueKind::BuiltinFunction(builtin) = &member.kind else {
        panic!("'{}' is not a method", name);
    };
    let Native::Method(function) = builtin.native else {
        panic!("'{}' is not bound to a receiver", name);
    };
    function(builtin.receiver.as_ref().unwrap(), arguments)
}

#[test]
fn test_result_type_follows_left_operand() {
    let result = int(7).binary(BinaryOperator::Add, &Value::float(0.9)).unwrap();
    assert!(matches!(result.kind, ValueKind::Integer(7)));

    let result = Value::float(1.5).binary(BinaryOperator::Add, &int(1)).unwrap();
    assert!(matches!(result.kind, ValueKind::Float(value) if value == 2.5));

    let result = int(7).binary(BinaryOperator::Divide, &int(2)).unwrap();
    assert!(matches!(result.kind, ValueKind::Integer(3)));

    let result = int(2).binary(BinaryOperator::Power, &int(10)).unwrap();
    assert!(matches!(result.kind, ValueKind::Integer(1024)));
}

#[test]
fn test_division_and_modulo_by_zero() {
    let error = int(1).binary(BinaryOperator::Divide, &int(0)).unwrap_err();
    assert_eq!(error.tag, "math-error");
    assert_eq!(error.detail, "division by zero");

    let error = Value::float(1.0).binary(BinaryOperator::Modulo, &Value::float(0.0)).unwrap_err();
    assert_eq!(error.detail, "modulo by zero");
}

#[test]
fn test_integer_overflow_is_a_math_error() {
    let error = int(i64::MAX).binary(BinaryOperator::Add, &int(1)).unwrap_err();

    assert_eq!(error.tag, "math-error");
    assert_eq!(error.detail, "integer overflow");
}

#[test]
fn test_illegal_operation() {
    let error = int(1).binary(BinaryOperator::Add, &string("a")).unwrap_err();

    assert_eq!(error.tag, "type-error");
    assert_eq!(error.detail, "illegal operation: integer + string");
}

#[test]
fn test_indexing_with_less_or_equal() {
    let list = Value::list(vec![int(10), int(20)]);

    let element = list.binary(BinaryOperator::LessOrEqual, &int(1)).unwrap();
    assert_eq!(element, int(20));

    let error = list.binary(BinaryOperator::LessOrEqual, &int(2)).unwrap_err();
    assert_eq!(error.tag, "index-error");
    assert_eq!(error.detail, "index 2 is out of range for length 2");

    assert_eq!(tag(list.binary(BinaryOperator::LessOrEqual, &string("0"))), "type-error");

    let character = string("héllo").binary(BinaryOperator::LessOrEqual, &int(1)).unwrap();
    assert_eq!(character, string("é"));

    let comparison = int(1).binary(BinaryOperator::LessOrEqual, &int(2)).unwrap();
    assert_eq!(comparison, Value::boolean(true));
}

#[test]
fn test_less_or_equal_compares_two_strings() {
    assert_eq!(
        string("a").binary(BinaryOperator::LessOrEqual, &string("b")).unwrap(),
        Value::boolean(true)
    );
    assert_eq!(
        string("b").binary(BinaryOperator::LessOrEqual, &string("a")).unwrap(),
        Value::boolean(false)
    );
    assert_eq!(
        string("abc").binary(BinaryOperator::LessOrEqual, &int(1)).unwrap(),
        string("b")
    );
}

#[test]
fn test_list_operators_mutate_in_place() {
    let list = Value::list(vec![int(1), int(2), int(3)]);
    let alias = list.clone();

    let appended = list.binary(BinaryOperator::Add, &int(4)).unwrap();
    assert!(appended.is_nothing());
    assert_eq!(alias.to_string(), "[1, 2, 3, 4]");

    let popped = list.binary(BinaryOperator::Subtract, &int(0)).unwrap();
    assert_eq!(popped, int(1));
    assert_eq!(alias.to_string(), "[2, 3, 4]");
}

#[test]
fn test_character_list_operators() {
    let buffer = Value::character_list("ab".chars().collect());

    assert!(buffer.binary(BinaryOperator::Add, &string("cd")).unwrap().is_nothing());
    assert_eq!(buffer.to_string(), "abcd");
    assert_eq!(buffer.binary(BinaryOperator::Subtract, &int(0)).unwrap(), string("a"));
    assert_eq!(buffer.repr(), "'bcd'");
}

#[test]
fn test_sequence_repeat_and_truncate() {
    assert_eq!(
        string("ab").binary(BinaryOperator::Multiply, &int(3)).unwrap(),
        string("ababab")
    );
    assert_eq!(
        tag(string("ab").binary(BinaryOperator::Multiply, &int(-1))),
        "math-error"
    );

    let array = Value::array(vec![int(1), int(2), int(3), int(4)]);
    assert_eq!(
        array.binary(BinaryOperator::Divide, &int(2)).unwrap().to_string(),
        "(1, 2)"
    );
    assert_eq!(
        string("abcdef").binary(BinaryOperator::Divide, &int(3)).unwrap(),
        string("ab")
    );
}

#[test]
fn test_truncating_by_a_fraction_keeps_everything() {
    let half = Value::float(0.5);

    let array = Value::array(vec![int(1), int(2), int(3)]);
    assert_eq!(array.binary(BinaryOperator::Divide, &half).unwrap().to_string(), "(1, 2, 3)");

    let list = Value::list(vec![int(1), int(2), int(3)]);
    assert_eq!(list.binary(BinaryOperator::Divide, &half).unwrap().to_string(), "[1, 2, 3]");

    let buffer = Value::character_list("abc".chars().collect());
    assert_eq!(buffer.binary(BinaryOperator::Divide, &half).unwrap().repr(), "'abc'");

    assert_eq!(
        string("abc").binary(BinaryOperator::Divide, &half).unwrap(),
        string("abc")
    );
}

#[test]
fn test_oversized_repetition_is_a_math_error() {
    let huge = int(4_611_686_018_427_387_904);

    let error = string("ab").binary(BinaryOperator::Multiply, &huge).unwrap_err();
    assert_eq!(error.tag, "math-error");
    assert_eq!(error.detail, "repeated sequence is too large");

    for sequence in [
        Value::array(vec![int(1)]),
        Value::list(vec![int(1)]),
        Value::character_list(vec!['a']),
    ] {
        assert_eq!(tag(sequence.binary(BinaryOperator::Multiply, &huge)), "math-error");
    }

    assert_eq!(
        tag(string("ab").binary(BinaryOperator::Multiply, &Value::float(1e300))),
        "math-error"
    );
    assert_eq!(
        Value::array(vec![]).binary(BinaryOperator::Multiply, &huge).unwrap().to_string(),
        "()"
    );
}

#[test]
fn test_array_concatenation_builds_a_new_array() {
    let left = Value::array(vec![int(1)]);
    let joined = left
        .binary(BinaryOperator::Add, &Value::array(vec![int(2)]))
        .unwrap();

    assert_eq!(joined.to_string(), "(1, 2)");
    assert_eq!(left.to_string(), "(1,)");
}

#[test]
fn test_numbers_compare_across_kinds() {
    assert_eq!(int(1), Value::float(1.0));
    assert_ne!(int(1), string("1"));
    assert_eq!(
        Value::array(vec![int(1), string("a")]),
        Value::array(vec![Value::float(1.0), string("a")])
    );
}

#[test]
fn test_membership_dispatches_on_the_container() {
    let list = Value::list(vec![int(1), int(2)]);

    assert_eq!(int(2).binary(BinaryOperator::In, &list).unwrap(), Value::boolean(true));
    assert_eq!(
        string("ell").binary(BinaryOperator::In, &string("hello")).unwrap(),
        Value::boolean(true)
    );
    assert_eq!(tag(int(2).binary(BinaryOperator::In, &int(3))), "type-error");
}

#[test]
fn test_dictionary_keys_use_value_equality() {
    let mut dictionary = Dictionary::new();
    dictionary.insert(int(1), string("one")).unwrap();
    dictionary.insert(Value::float(1.0), string("uno")).unwrap();
    dictionary.insert(string("b"), int(2)).unwrap();

    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.get(&int(1)).unwrap(), Some(&string("uno")));
    assert_eq!(dictionary.keys(), vec![int(1), string("b")]);

    assert_eq!(dictionary.remove(&int(1)).unwrap(), Some(string("uno")));
    assert_eq!(dictionary.get(&string("b")).unwrap(), Some(&int(2)));
}

#[test]
fn test_unhashable_keys() {
    let mut dictionary = Dictionary::new();
    let error = dictionary.insert(Value::list(vec![]), int(1)).unwrap_err();

    assert_eq!(error.tag, "type-error");
    assert_eq!(error.detail, "unhashable type: list");
    assert!(dictionary
        .insert(Value::array(vec![int(1), string("a")]), int(1))
        .is_ok());
}

#[test]
fn test_dictionary_subtraction_removes_a_key() {
    let dictionary = Value::dictionary(
        Dictionary::from_pairs(vec![(string("a"), int(1)), (string("b"), int(2))]).unwrap(),
    );

    assert_eq!(dictionary.binary(BinaryOperator::Subtract, &string("a")).unwrap(), int(1));
    assert_eq!(dictionary.to_string(), "{\"b\": 2}");
    assert_eq!(
        dictionary.binary(BinaryOperator::Subtract, &string("a")).unwrap_err().detail,
        "key \"a\" not found"
    );
}

#[test]
fn test_display() {
    assert_eq!(Value::nothing().to_string(), "nothing");
    assert_eq!(Value::float(3.0).to_string(), "3.0");
    assert_eq!(Value::array(vec![]).to_string(), "()");
    assert_eq!(
        Value::list(vec![string("a"), Value::boolean(true)]).to_string(),
        "[\"a\", true]"
    );
}

#[test]
fn test_truthiness() {
    assert!(!Value::nothing().is_true());
    assert!(!int(0).is_true());
    assert!(!string("").is_true());
    assert!(Value::list(vec![int(0)]).is_true());
}

#[test]
fn test_members() {
    let text = string("Hello");

    assert_eq!(lookup_member(&text, "length").unwrap(), int(5));
    assert_eq!(lookup_member(&int(1), "type").unwrap(), string("integer"));
    assert_eq!(call_member(&text, "upper", &[]).unwrap(), string("HELLO"));
    assert_eq!(call_member(&text, "slice", &[int(1), int(3)]).unwrap(), string("el"));
    assert_eq!(
        call_member(&text, "slice", &[int(2), int(9)]).unwrap_err().detail,
        "slice 2..9 is out of range for length 5"
    );
    assert_eq!(call_member(&int(42), "as_string", &[]).unwrap(), string("42"));
    assert_eq!(call_member(&string(" 12 "), "as_int", &[]).unwrap(), int(12));
    assert_eq!(call_member(&Value::float(2.9), "as_int", &[]).unwrap(), int(2));
    assert!(lookup_member(&int(1), "length").is_none());
}

#[test]
fn test_list_members_share_the_receiver() {
    let list = Value::list(vec![int(1), int(3)]);

    call_member(&list, "insert", &[int(1), int(2)]).unwrap();
    call_member(&list, "insert", &[int(3), int(4)]).unwrap();
    assert_eq!(list.to_string(), "[1, 2, 3, 4]");

    assert_eq!(call_member(&list, "remove", &[int(0)]).unwrap(), int(1));
    assert_eq!(list.to_string(), "[2, 3, 4]");
}

#[test]
fn test_dictionary_get_defaults_to_nothing() {
    let dictionary = Value::dictionary(Dictionary::from_pairs(vec![(string("a"), int(1))]).unwrap());

    assert_eq!(call_member(&dictionary, "get", &[string("a")]).unwrap(), int(1));
    assert!(call_member(&dictionary, "get", &[string("z")]).unwrap().is_nothing());
    assert_eq!(
        call_member(&dictionary, "keys", &[]).unwrap().to_string(),
        "[\"a\"]"
    );
}
