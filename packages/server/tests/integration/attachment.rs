use crate::common::{TestApp, missing_id, routes};

mod attachment_upload {
    use super::*;

    #[tokio::test]
    async fn appends_record_and_stores_file() {
        let app = TestApp::spawn().await;
        let article_id = app.create_article("Illustrated", "<p>pic</p>").await;

        let res = app
            .upload_attachment(&article_id, "figure.png", "image/png", b"PNG_DATA".to_vec())
            .await;
        assert_eq!(res.status, 201);

        let attachment = &res.body["attachment"];
        assert_eq!(attachment["originalname"], "figure.png");
        assert_eq!(attachment["mimetype"], "image/png");
        assert_eq!(attachment["size"].as_i64().unwrap(), 8);

        let filename = attachment["filename"].as_str().unwrap();
        assert!(filename.ends_with(".png"));
        assert_ne!(filename, "figure.png");
        assert_eq!(
            attachment["url"].as_str().unwrap(),
            format!("/uploads/{filename}")
        );

        // Record lands on the article.
        let res = app.get(&routes::article(&article_id)).await;
        let attachments = res.body["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 1);

        // Stored bytes are served back verbatim.
        let res = app.get(&routes::upload(filename)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.text, "PNG_DATA");
    }

    #[tokio::test]
    async fn pdf_is_allowed() {
        let app = TestApp::spawn().await;
        let article_id = app.create_article("Paper", "<p>pdf</p>").await;

        let res = app
            .upload_attachment(
                &article_id,
                "paper.pdf",
                "application/pdf",
                b"%PDF-1.4".to_vec(),
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["attachment"]["mimetype"], "application/pdf");
    }

    #[tokio::test]
    async fn disallowed_type_is_rejected_without_side_effects() {
        let app = TestApp::spawn().await;
        let article_id = app.create_article("Plain", "<p>txt</p>").await;

        let res = app
            .upload_attachment(&article_id, "notes.txt", "text/plain", b"hello".to_vec())
            .await;
        assert_eq!(res.status, 400);

        let res = app.get(&routes::article(&article_id)).await;
        assert_eq!(res.body["attachments"].as_array().unwrap().len(), 0);
        assert_eq!(app.stored_file_count(), 0);
    }

    #[tokio::test]
    async fn missing_article_leaves_no_stored_file() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_attachment(&missing_id(), "figure.png", "image/png", b"PNG".to_vec())
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(app.stored_file_count(), 0);
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let article_id = app.create_article("Empty form", "<p>x</p>").await;

        let form = reqwest::multipart::Form::new().text("note", "no file here");
        let res = app
            .client
            .post(format!(
                "http://{}{}",
                app.addr,
                routes::article_attachments(&article_id)
            ))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");
        let res = crate::common::TestResponse::from_response(res).await;

        assert_eq!(res.status, 400);
        assert_eq!(app.stored_file_count(), 0);
    }

    #[tokio::test]
    async fn repeated_uploads_append_in_order() {
        let app = TestApp::spawn().await;
        let article_id = app.create_article("Gallery", "<p>pics</p>").await;

        app.upload_attachment(&article_id, "a.png", "image/png", b"A".to_vec())
            .await;
        app.upload_attachment(&article_id, "b.gif", "image/gif", b"B".to_vec())
            .await;

        let res = app.get(&routes::article(&article_id)).await;
        let attachments = res.body["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0]["originalname"], "a.png");
        assert_eq!(attachments[1]["originalname"], "b.gif");

        // Same original name still gets a fresh storage name.
        let res = app
            .upload_attachment(&article_id, "a.png", "image/png", b"A2".to_vec())
            .await;
        assert_eq!(res.status, 201);
        assert_ne!(
            res.body["attachment"]["filename"],
            attachments[0]["filename"]
        );
        assert_eq!(app.stored_file_count(), 3);
    }
}
