#[cfg(test)]
mod dispatch_tests {
    use std::sync::Mutex;

    use wss_agent_core::compression::StreamDecompressor;
    use wss_agent_core::config::ClientConfig;
    use wss_agent_core::dispatch::{
        AgentProjectInfo, AgentService, Coordinates, DependencyInfo, FormRequest, RequestFactory,
        RequestType, ResultEnvelope, ServiceDispatcher, ServiceRequest, ServiceResult, Transport,
        TransportError, UpdateType,
    };
    use wss_agent_core::AgentError;

    /// Records every form and replies with a fixed body (or a status error).
    struct MockTransport {
        reply: Result<String, u16>,
        sent: Mutex<Vec<(String, FormRequest)>>,
    }

    impl MockTransport {
        fn replying(body: &str) -> Self {
            Self { reply: Ok(body.to_string()), sent: Mutex::new(Vec::new()) }
        }

        fn failing(status: u16) -> Self {
            Self { reply: Err(status), sent: Mutex::new(Vec::new()) }
        }

        fn last_form(&self) -> FormRequest {
            self.sent.lock().unwrap().last().expect("no request sent").1.clone()
        }
    }

    impl Transport for MockTransport {
        fn post_form(&self, url: &str, form: &FormRequest) -> Result<String, TransportError> {
            self.sent.lock().unwrap().push((url.to_string(), form.clone()));
            match &self.reply {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(TransportError::Status { status: *status, body: "down".into() }),
            }
        }
    }

    fn success_body(data: &str) -> String {
        serde_json::to_string(&ResultEnvelope::success(data)).unwrap()
    }

    fn config() -> ClientConfig {
        ClientConfig::new("test-agent", "2.0", "3.1").with_service_url("http://localhost:9/agent")
    }

    fn dispatcher(transport: MockTransport) -> ServiceDispatcher<MockTransport> {
        ServiceDispatcher::with_transport(&config(), transport)
    }

    fn factory() -> RequestFactory {
        RequestFactory::new("test-agent", "2.0", "3.1")
    }

    fn projects() -> Vec<AgentProjectInfo> {
        vec![AgentProjectInfo::new(Coordinates::new("org.acme", "app", "1.0")).with_dependencies(vec![
            DependencyInfo::new("org.lib", "core", "4.2").with_sha1("deadbeef"),
        ])]
    }

    fn update_request() -> ServiceRequest {
        factory().new_update_inventory_request("org-token", "product", "1.0", projects(), UpdateType::Append)
    }

    // ---- BUILD ----

    #[test]
    fn update_request_carries_update_type_only() {
        let d = dispatcher(MockTransport::replying(""));
        let form = d.build_request(&update_request()).unwrap();

        assert_eq!(form.get("type"), Some("UPDATE"));
        assert_eq!(form.get("updateType"), Some("APPEND"));
        assert!(!form.contains("forceCheckAllDependencies"));
    }

    #[test]
    fn compliance_request_carries_force_flag_only() {
        let d = dispatcher(MockTransport::replying(""));
        let request = factory().new_check_policy_compliance_request("t", "p", "v", projects(), true);
        let form = d.build_request(&request).unwrap();

        assert_eq!(form.get("type"), Some("CHECK_POLICY_COMPLIANCE"));
        assert_eq!(form.get("forceCheckAllDependencies"), Some("true"));
        assert!(!form.contains("updateType"));
    }

    #[test]
    fn other_requests_carry_no_extra_fields() {
        let d = dispatcher(MockTransport::replying(""));
        for request in [
            factory().new_check_policies_request("t", "p", "v", projects()),
            factory().new_dependency_data_request("t", "p", "v", projects()),
        ] {
            let form = d.build_request(&request).unwrap();
            assert!(!form.contains("updateType"));
            assert!(!form.contains("forceCheckAllDependencies"));
        }
    }

    #[test]
    fn common_fields_are_in_wire_order() {
        let d = dispatcher(MockTransport::replying(""));
        let request = update_request().with_requester_email("dev@acme.io");
        let form = d.build_request(&request).unwrap();

        let names: Vec<&str> = form.names().collect();
        assert_eq!(
            names,
            vec![
                "type", "agent", "agentVersion", "token", "requesterEmail", "product",
                "productVersion", "timeStamp", "pluginVersion", "updateType", "diff",
            ]
        );
        assert_eq!(form.get("agent"), Some("test-agent"));
        assert_eq!(form.get("agentVersion"), Some("2.0"));
        assert_eq!(form.get("pluginVersion"), Some("3.1"));
        assert_eq!(form.get("token"), Some("org-token"));
        assert_eq!(form.get("requesterEmail"), Some("dev@acme.io"));
        assert_eq!(form.get("timeStamp"), Some(request.time_stamp.to_string().as_str()));
    }

    #[test]
    fn missing_requester_email_is_sent_empty() {
        let d = dispatcher(MockTransport::replying(""));
        let form = d.build_request(&update_request()).unwrap();
        assert_eq!(form.get("requesterEmail"), Some(""));
    }

    #[test]
    fn diff_decompresses_to_projects_json() {
        let d = dispatcher(MockTransport::replying(""));
        let form = d.build_request(&update_request()).unwrap();

        let json = StreamDecompressor::default().decompress(form.get("diff").unwrap()).unwrap();
        let back: Vec<AgentProjectInfo> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, projects());
        assert!(json.contains("\"groupId\":\"org.acme\""));
        assert!(json.contains("\"sha1\":\"deadbeef\""));
    }

    #[test]
    fn form_body_is_urlencoded() {
        let mut form = FormRequest::new();
        form.push("a", "x y");
        form.push("b", "1+2=3&");
        assert_eq!(form.encode(), "a=x+y&b=1%2B2%3D3%26");
    }

    // ---- PARSE / full call ----

    #[test]
    fn update_inventory_decodes_result_and_posts_to_service_url() {
        let data = r#"{"organization":"acme","createdProjects":["app"],"updatedProjects":[],"requestToken":"rq-1"}"#;
        let d = dispatcher(MockTransport::replying(&success_body(data)));

        let result = d.update_inventory(&update_request()).unwrap();
        assert_eq!(result.organization, "acme");
        assert_eq!(result.created_projects, vec!["app".to_string()]);
        assert_eq!(result.request_token.as_deref(), Some("rq-1"));

        let sent = d.transport().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "http://localhost:9/agent");
    }

    #[test]
    fn result_type_follows_request_type() {
        let d = dispatcher(MockTransport::replying(&success_body(
            r#"{"organization":"acme","projects":[{"name":"app"}]}"#,
        )));
        let request = factory().new_dependency_data_request("t", "p", "v", projects());

        match d.service(&request).unwrap() {
            ServiceResult::GetDependencyData(r) => {
                assert_eq!(r.organization, "acme");
                assert_eq!(r.projects.len(), 1);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn policy_results_decode_project_maps() {
        let data = r#"{"organization":"acme","existingProjects":{"app":{"children":[]}},"newProjects":{},"projectNewResources":{"app":[{"sha1":"x"}]}}"#;
        let d = dispatcher(MockTransport::replying(&success_body(data)));
        let request = factory().new_check_policies_request("t", "p", "v", projects());

        let result = d.check_policies(&request).unwrap();
        assert!(result.existing_projects.contains_key("app"));
        assert_eq!(result.project_new_resources["app"].len(), 1);
        assert!(result.new_projects.is_empty());
    }

    #[test]
    fn service_error_carries_message() {
        let d = dispatcher(MockTransport::replying(r#"{"status":1,"message":"bad token","data":""}"#));
        match d.service(&update_request()) {
            Err(AgentError::Service { message, .. }) => assert_eq!(message, "bad token"),
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_response_is_protocol_error_with_raw_body() {
        let d = dispatcher(MockTransport::replying("<html>oops</html>"));
        match d.service(&update_request()) {
            Err(AgentError::Protocol { raw, .. }) => assert_eq!(raw, "<html>oops</html>"),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_data_is_protocol_error() {
        for data in ["", "not json", "[1,2,3]"] {
            let d = dispatcher(MockTransport::replying(&success_body(data)));
            let err = d.service(&update_request()).unwrap_err();
            assert!(matches!(err, AgentError::Protocol { .. }), "{data:?}: {err:?}");
        }
    }

    #[test]
    fn transport_failure_is_surfaced_once() {
        let d = dispatcher(MockTransport::failing(503));
        let err = d.service(&update_request()).unwrap_err();
        assert!(matches!(err, AgentError::Transport(TransportError::Status { status: 503, .. })), "{err:?}");
        assert_eq!(d.transport().sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn typed_call_rejects_other_request_kind_before_sending() {
        let d = dispatcher(MockTransport::replying(&success_body("{}")));
        let request = factory().new_check_policies_request("t", "p", "v", projects());

        match d.update_inventory(&request) {
            Err(AgentError::RequestMismatch { expected, actual }) => {
                assert_eq!(expected, RequestType::Update);
                assert_eq!(actual, RequestType::CheckPolicies);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
        assert!(d.transport().sent.lock().unwrap().is_empty());
    }

    // ---- AgentService ----

    #[test]
    fn agent_service_stamps_identity_and_email() {
        let cfg = config();
        let transport = MockTransport::replying(&success_body(r#"{"organization":"acme"}"#));
        let service = AgentService::with_dispatcher(&cfg, ServiceDispatcher::with_transport(&cfg, transport));

        let result = service
            .check_policy_compliance("tok", Some("qa@acme.io"), "prod", "9", projects(), false)
            .unwrap();
        assert_eq!(result.organization, "acme");

        let form = service.dispatcher().transport().last_form();
        assert_eq!(form.get("agent"), Some("test-agent"));
        assert_eq!(form.get("requesterEmail"), Some("qa@acme.io"));
        assert_eq!(form.get("forceCheckAllDependencies"), Some("false"));
    }

    #[test]
    fn offline_update_is_not_sent_and_serializes() {
        let cfg = config();
        let service = AgentService::with_dispatcher(
            &cfg,
            ServiceDispatcher::with_transport(&cfg, MockTransport::replying("")),
        );

        let request = service.offline_update("tok", None, UpdateType::Override, "prod", "1", projects());
        assert_eq!(request.request_type(), RequestType::Update);
        assert!(request.requester_email.is_none());
        assert!(request.time_stamp > 0);

        let json = service
            .offline_update_json("tok", Some("a@b.c"), UpdateType::Override, "prod", "1", projects())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "UPDATE");
        assert_eq!(value["updateType"], "OVERRIDE");
        assert_eq!(value["orgToken"], "tok");
        assert_eq!(value["requesterEmail"], "a@b.c");
        assert_eq!(value["projects"][0]["coordinates"]["artifactId"], "app");

        let back: ServiceRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.request_type(), RequestType::Update);

        assert!(service.dispatcher().transport().sent.lock().unwrap().is_empty());
    }
}
