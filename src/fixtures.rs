//! Sample API responses shared by the unit tests.

pub const VIEW_APPLICATIONS: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<applications type="array">
  <application>
    <id type="integer">123</id>
    <name>My Application</name>
    <overview-url>https://rpm.newrelic.com/accounts/1/applications/123</overview-url>
    <servers-url>https://api.newrelic.com/api/v1/accounts/1/applications/123/servers</servers-url>
  </application>
  <application>
    <id type="integer">124</id>
    <name>My Application2</name>
    <overview-url>https://rpm.newrelic.com/accounts/1/applications/124</overview-url>
    <servers-url>https://api.newrelic.com/api/v1/accounts/1/applications/123/servers</servers-url>
  </application>
</applications>
"#;

pub const DELETE_APPLICATIONS: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<applications type="array">
  <application id="123">
    <result>deleted</result>
  </application>
  <application id="124">
    <result>failed: application has active agents</result>
  </application>
</applications>
"#;

pub const METRIC_NAMES: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<metrics type="array">
  <metric name="WebTransaction">
    <fields type="array">
      <field name="average_call_time"/>
      <field name="average_response_time"/>
      <field name="call_count"/>
    </fields>
  </metric>
  <metric name="WebTransaction/RPMCollector/AgentListener/connect">
    <fields type="array">
      <field name="max_call_time"/>
      <field name="min_call_time"/>
    </fields>
  </metric>
</metrics>
"#;

pub const METRIC_DATA: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<metrics type="array">
  <metric app="My Application" agent_id="123456" begin="2011-04-20T15:47:00Z" end="2011-04-20T15:48:00Z" name="ActiveRecord/all">
    <field type="integer" name="average_response_time">0</field>
  </metric>
  <metric app="My Application" agent_id="123456" begin="2011-04-20T15:48:00Z" end="2011-04-20T15:49:00Z" name="ActiveRecord/all">
    <field type="integer" name="average_response_time">3</field>
  </metric>
</metrics>
"#;

pub const DEPLOYMENT: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<deployment>
  <account-id type="integer">1</account-id>
  <agent-id type="integer">123</agent-id>
  <changelog nil="true"></changelog>
  <description>Release 42</description>
  <id type="integer">9001</id>
  <revision>abc123</revision>
  <user>deployer</user>
</deployment>
"#;

pub const THRESHOLD_VALUES: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<threshold-values type="array">
  <threshold_value name="Apdex" metric_value="0.98" formatted_metric_value="0.98 [0.5]" threshold_value="1" begin_time="2011-04-20 15:47:00" end_time="2011-04-20 15:50:00"/>
  <threshold_value name="Error Rate" metric_value="0" formatted_metric_value="0%" threshold_value="1" begin_time="2011-04-20 15:47:00" end_time="2011-04-20 15:50:00"/>
</threshold-values>
"#;

pub const VIEW_SERVERS: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<servers type="array">
  <server>
    <id type="integer">42</id>
    <hostname>web-1.example.com</hostname>
    <overview-url>https://rpm.newrelic.com/accounts/1/servers/42</overview-url>
  </server>
</servers>
"#;

pub const DELETE_SERVER: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<servers type="array">
  <server id="42">
    <result>deleted</result>
  </server>
</servers>
"#;

pub const DELETE_SERVER_FAILED: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<servers type="array">
  <server id="43">
    <result>server is still reporting</result>
  </server>
</servers>
"#;
