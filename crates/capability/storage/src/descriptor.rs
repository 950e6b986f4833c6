//! MCAP schema 数据：`event.proto` 的 FileDescriptorSet
//!
//! 与 `proto.rs` 中的消息定义一一对应，读取方可据此自描述解码。

use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, OneofDescriptorProto,
};

const TIMESTAMP_FILE: &str = "google/protobuf/timestamp.proto";
const EVENT_FILE: &str = "event.proto";

/// 序列化后的 FileDescriptorSet（MCAP schema data）。
pub fn schema_data() -> Vec<u8> {
    file_descriptor_set().encode_to_vec()
}

pub fn file_descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![timestamp_file(), event_file()],
    }
}

fn timestamp_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(TIMESTAMP_FILE.to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![message(
            "Timestamp",
            vec![
                scalar("seconds", 1, Type::Int64),
                scalar("nanos", 2, Type::Int32),
            ],
        )],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn event_file() -> FileDescriptorProto {
    let wrapper = DescriptorProto {
        oneof_decl: vec![oneof("event")],
        ..message(
            "EventWrapper",
            vec![in_oneof(message_field("metric", 2, ".event.Metric"), 0)],
        )
    };

    let tags_entry = DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message(
            "TagsV1Entry",
            vec![
                scalar("key", 1, Type::String),
                scalar("value", 2, Type::String),
            ],
        )
    };

    let kind = EnumDescriptorProto {
        name: Some("Kind".to_string()),
        value: vec![enum_value("Incremental", 0), enum_value("Absolute", 1)],
        ..Default::default()
    };

    let metric = DescriptorProto {
        nested_type: vec![tags_entry],
        enum_type: vec![kind],
        oneof_decl: vec![oneof("value")],
        ..message(
            "Metric",
            vec![
                scalar("name", 1, Type::String),
                message_field("timestamp", 2, ".google.protobuf.Timestamp"),
                FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    ..message_field("tags_v1", 3, ".event.Metric.TagsV1Entry")
                },
                FieldDescriptorProto {
                    r#type: Some(Type::Enum as i32),
                    ..message_field("kind", 4, ".event.Metric.Kind")
                },
                in_oneof(message_field("counter", 5, ".event.Counter"), 0),
                in_oneof(message_field("gauge", 6, ".event.Gauge"), 0),
                in_oneof(message_field("set", 7, ".event.Set"), 0),
                scalar("namespace", 11, Type::String),
            ],
        )
    };

    FileDescriptorProto {
        name: Some(EVENT_FILE.to_string()),
        package: Some("event".to_string()),
        dependency: vec![TIMESTAMP_FILE.to_string()],
        message_type: vec![
            wrapper,
            metric,
            message("Counter", vec![scalar("value", 1, Type::Double)]),
            message("Gauge", vec![scalar("value", 1, Type::Double)]),
            message(
                "Set",
                vec![FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    ..scalar("values", 1, Type::String)
                }],
            ),
        ],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field,
        ..Default::default()
    }
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(json_name(name)),
        ..Default::default()
    }
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, Type::Message)
    }
}

fn in_oneof(field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(index),
        ..field
    }
}

fn oneof(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto {
        name: Some(name.to_string()),
        options: None,
    }
}

fn enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        options: None,
    }
}

// protoc 的 json_name：snake_case → lowerCamelCase。
fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(file: &'a FileDescriptorProto, name: &str) -> &'a DescriptorProto {
        file.message_type
            .iter()
            .find(|message| message.name.as_deref() == Some(name))
            .expect("message")
    }

    #[test]
    fn descriptor_set_round_trips() {
        let decoded = FileDescriptorSet::decode(schema_data().as_slice()).expect("decode");
        assert_eq!(decoded, file_descriptor_set());
        assert_eq!(decoded.file.len(), 2);
        assert_eq!(decoded.file[1].dependency, vec![TIMESTAMP_FILE.to_string()]);
    }

    #[test]
    fn field_numbers_match_wire_messages() {
        let file = event_file();
        let wrapper = find(&file, "EventWrapper");
        assert_eq!(wrapper.field[0].number, Some(2));
        assert_eq!(wrapper.field[0].oneof_index, Some(0));

        let metric = find(&file, "Metric");
        let numbers: Vec<(String, i32)> = metric
            .field
            .iter()
            .map(|field| (field.name.clone().unwrap_or_default(), field.number.unwrap_or(0)))
            .collect();
        assert!(numbers.contains(&("tags_v1".to_string(), 3)));
        assert!(numbers.contains(&("namespace".to_string(), 11)));
        assert_eq!(
            metric.nested_type[0].options.as_ref().and_then(|o| o.map_entry),
            Some(true)
        );
        assert_eq!(json_name("tags_v1"), "tagsV1");
    }
}
