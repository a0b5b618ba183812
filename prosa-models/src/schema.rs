table! {
    authors (id) {
        id -> Integer,
        name -> Text,
        slug -> Text,
        bio -> Nullable<Text>,
        creation_date -> Timestamp,
    }
}

table! {
    posts (id) {
        id -> Integer,
        name -> Text,
        content -> Text,
        description -> Nullable<Text>,
        image -> Nullable<Text>,
        image_blob -> Nullable<Binary>,
        image_mime -> Nullable<Text>,
        tag -> Nullable<Text>,
        author_id -> Nullable<Integer>,
        featured -> Bool,
        created_by -> Integer,
        creation_date -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Integer,
        username -> Text,
        display_name -> Text,
        email -> Text,
        hashed_password -> Nullable<Text>,
        avatar -> Nullable<Text>,
        role -> Integer,
        creation_date -> Timestamp,
    }
}

joinable!(posts -> authors (author_id));
joinable!(posts -> users (created_by));

allow_tables_to_appear_in_same_query!(authors, posts, users,);
